// ---- Entities ----

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoPrinter {
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub name: ::prost::alloc::string::String,
    /// One of "idle", "printing", "error".
    #[prost(string, tag = "3")]
    pub status: ::prost::alloc::string::String,
    #[prost(double, tag = "4")]
    pub filament_weight: f64,
    /// Empty when no job is attached.
    #[prost(string, tag = "5")]
    pub current_job_id: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoPrintJob {
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,
    /// One of "queued", "printing", "completed", "failed".
    #[prost(string, tag = "2")]
    pub status: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub printer_id: ::prost::alloc::string::String,
    #[prost(double, tag = "4")]
    pub filament_weight: f64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoFleetError {
    #[prost(string, tag = "1")]
    pub code: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub message: ::prost::alloc::string::String,
    #[prost(bool, tag = "3")]
    pub retryable: bool,
    /// Only set when the node is a follower that knows the current leader.
    #[prost(string, tag = "4")]
    pub leader_id: ::prost::alloc::string::String,
    #[prost(string, tag = "5")]
    pub leader_address: ::prost::alloc::string::String,
}
// ---- Printers ----

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoCreatePrinterReq {
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    #[prost(double, tag = "2")]
    pub filament_weight: f64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoGetPrinterReq {
    #[prost(string, tag = "1")]
    pub printer_id: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoListPrintersReq {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoUpdatePrinterStatusReq {
    #[prost(string, tag = "1")]
    pub printer_id: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub status: ::prost::alloc::string::String,
    /// Empty means "no job supplied".
    #[prost(string, tag = "3")]
    pub job_id: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoPrinterResult {
    #[prost(oneof = "proto_printer_result::Result", tags = "1, 2")]
    pub result: ::core::option::Option<proto_printer_result::Result>,
}
/// Nested message and enum types in `ProtoPrinterResult`.
pub mod proto_printer_result {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Result {
        #[prost(message, tag = "1")]
        Ok(super::ProtoPrinter),
        #[prost(message, tag = "2")]
        Err(super::ProtoFleetError),
    }
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoPrinterList {
    #[prost(message, repeated, tag = "1")]
    pub printers: ::prost::alloc::vec::Vec<ProtoPrinter>,
}
// ---- Jobs ----

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoSubmitJobReq {
    #[prost(string, tag = "1")]
    pub printer_id: ::prost::alloc::string::String,
    #[prost(double, tag = "2")]
    pub filament_weight: f64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoGetJobReq {
    #[prost(string, tag = "1")]
    pub job_id: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoListJobsReq {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoUpdateJobStatusReq {
    #[prost(string, tag = "1")]
    pub job_id: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub status: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoJobResult {
    #[prost(oneof = "proto_job_result::Result", tags = "1, 2")]
    pub result: ::core::option::Option<proto_job_result::Result>,
}
/// Nested message and enum types in `ProtoJobResult`.
pub mod proto_job_result {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Result {
        #[prost(message, tag = "1")]
        Ok(super::ProtoPrintJob),
        #[prost(message, tag = "2")]
        Err(super::ProtoFleetError),
    }
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoJobList {
    #[prost(message, repeated, tag = "1")]
    pub jobs: ::prost::alloc::vec::Vec<ProtoPrintJob>,
}
// ---- Node ----

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoGetStatusReq {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoNodeStatus {
    #[prost(string, tag = "1")]
    pub node_id: ::prost::alloc::string::String,
    /// One of "leader", "follower", "no_leader".
    #[prost(string, tag = "2")]
    pub role: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub leader_id: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub leader_address: ::prost::alloc::string::String,
}
#[doc = r" Generated server implementations."]
pub mod grpc_printer_fleet_server {
    #![allow(unused_variables, dead_code, missing_docs)]
    use tonic::codegen::*;
    #[doc = "Generated trait containing gRPC methods that should be implemented for use with GrpcPrinterFleetServer."]
    #[async_trait]
    pub trait GrpcPrinterFleet: Send + Sync + 'static {
        async fn create_printer(
            &self,
            request: tonic::Request<super::ProtoCreatePrinterReq>,
        ) -> Result<tonic::Response<super::ProtoPrinterResult>, tonic::Status>;
        async fn get_printer(
            &self,
            request: tonic::Request<super::ProtoGetPrinterReq>,
        ) -> Result<tonic::Response<super::ProtoPrinterResult>, tonic::Status>;
        async fn list_printers(
            &self,
            request: tonic::Request<super::ProtoListPrintersReq>,
        ) -> Result<tonic::Response<super::ProtoPrinterList>, tonic::Status>;
        async fn update_printer_status(
            &self,
            request: tonic::Request<super::ProtoUpdatePrinterStatusReq>,
        ) -> Result<tonic::Response<super::ProtoPrinterResult>, tonic::Status>;
        async fn submit_job(
            &self,
            request: tonic::Request<super::ProtoSubmitJobReq>,
        ) -> Result<tonic::Response<super::ProtoJobResult>, tonic::Status>;
        async fn get_job(
            &self,
            request: tonic::Request<super::ProtoGetJobReq>,
        ) -> Result<tonic::Response<super::ProtoJobResult>, tonic::Status>;
        async fn list_jobs(
            &self,
            request: tonic::Request<super::ProtoListJobsReq>,
        ) -> Result<tonic::Response<super::ProtoJobList>, tonic::Status>;
        async fn update_job_status(
            &self,
            request: tonic::Request<super::ProtoUpdateJobStatusReq>,
        ) -> Result<tonic::Response<super::ProtoJobResult>, tonic::Status>;
        async fn get_status(
            &self,
            request: tonic::Request<super::ProtoGetStatusReq>,
        ) -> Result<tonic::Response<super::ProtoNodeStatus>, tonic::Status>;
    }
    #[doc = " Client facing API of a fleet node. Mutating calls are only accepted by the leader; followers"]
    #[doc = " answer with an error carrying the leader hint."]
    #[derive(Debug)]
    pub struct GrpcPrinterFleetServer<T: GrpcPrinterFleet> {
        inner: _Inner<T>,
    }
    struct _Inner<T>(Arc<T>, Option<tonic::Interceptor>);
    impl<T: GrpcPrinterFleet> GrpcPrinterFleetServer<T> {
        pub fn new(inner: T) -> Self {
            let inner = Arc::new(inner);
            let inner = _Inner(inner, None);
            Self { inner }
        }
        pub fn with_interceptor(inner: T, interceptor: impl Into<tonic::Interceptor>) -> Self {
            let inner = Arc::new(inner);
            let inner = _Inner(inner, Some(interceptor.into()));
            Self { inner }
        }
    }
    impl<T, B> Service<http::Request<B>> for GrpcPrinterFleetServer<T>
    where
        T: GrpcPrinterFleet,
        B: HttpBody + Send + Sync + 'static,
        B::Error: Into<StdError> + Send + 'static,
    {
        type Response = http::Response<tonic::body::BoxBody>;
        type Error = Never;
        type Future = BoxFuture<Self::Response, Self::Error>;
        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }
        fn call(&mut self, req: http::Request<B>) -> Self::Future {
            let inner = self.inner.clone();
            match req.uri().path() {
                "/printfleet.GrpcPrinterFleet/CreatePrinter" => {
                    #[allow(non_camel_case_types)]
                    struct CreatePrinterSvc<T: GrpcPrinterFleet>(pub Arc<T>);
                    impl<T: GrpcPrinterFleet>
                        tonic::server::UnaryService<super::ProtoCreatePrinterReq>
                        for CreatePrinterSvc<T>
                    {
                        type Response = super::ProtoPrinterResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoCreatePrinterReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).create_printer(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = CreatePrinterSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/printfleet.GrpcPrinterFleet/GetPrinter" => {
                    #[allow(non_camel_case_types)]
                    struct GetPrinterSvc<T: GrpcPrinterFleet>(pub Arc<T>);
                    impl<T: GrpcPrinterFleet> tonic::server::UnaryService<super::ProtoGetPrinterReq>
                        for GetPrinterSvc<T>
                    {
                        type Response = super::ProtoPrinterResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoGetPrinterReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).get_printer(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = GetPrinterSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/printfleet.GrpcPrinterFleet/ListPrinters" => {
                    #[allow(non_camel_case_types)]
                    struct ListPrintersSvc<T: GrpcPrinterFleet>(pub Arc<T>);
                    impl<T: GrpcPrinterFleet>
                        tonic::server::UnaryService<super::ProtoListPrintersReq>
                        for ListPrintersSvc<T>
                    {
                        type Response = super::ProtoPrinterList;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoListPrintersReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).list_printers(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = ListPrintersSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/printfleet.GrpcPrinterFleet/UpdatePrinterStatus" => {
                    #[allow(non_camel_case_types)]
                    struct UpdatePrinterStatusSvc<T: GrpcPrinterFleet>(pub Arc<T>);
                    impl<T: GrpcPrinterFleet>
                        tonic::server::UnaryService<super::ProtoUpdatePrinterStatusReq>
                        for UpdatePrinterStatusSvc<T>
                    {
                        type Response = super::ProtoPrinterResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoUpdatePrinterStatusReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).update_printer_status(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = UpdatePrinterStatusSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/printfleet.GrpcPrinterFleet/SubmitJob" => {
                    #[allow(non_camel_case_types)]
                    struct SubmitJobSvc<T: GrpcPrinterFleet>(pub Arc<T>);
                    impl<T: GrpcPrinterFleet> tonic::server::UnaryService<super::ProtoSubmitJobReq>
                        for SubmitJobSvc<T>
                    {
                        type Response = super::ProtoJobResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoSubmitJobReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).submit_job(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = SubmitJobSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/printfleet.GrpcPrinterFleet/GetJob" => {
                    #[allow(non_camel_case_types)]
                    struct GetJobSvc<T: GrpcPrinterFleet>(pub Arc<T>);
                    impl<T: GrpcPrinterFleet> tonic::server::UnaryService<super::ProtoGetJobReq> for GetJobSvc<T> {
                        type Response = super::ProtoJobResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoGetJobReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).get_job(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = GetJobSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/printfleet.GrpcPrinterFleet/ListJobs" => {
                    #[allow(non_camel_case_types)]
                    struct ListJobsSvc<T: GrpcPrinterFleet>(pub Arc<T>);
                    impl<T: GrpcPrinterFleet> tonic::server::UnaryService<super::ProtoListJobsReq> for ListJobsSvc<T> {
                        type Response = super::ProtoJobList;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoListJobsReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).list_jobs(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = ListJobsSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/printfleet.GrpcPrinterFleet/UpdateJobStatus" => {
                    #[allow(non_camel_case_types)]
                    struct UpdateJobStatusSvc<T: GrpcPrinterFleet>(pub Arc<T>);
                    impl<T: GrpcPrinterFleet>
                        tonic::server::UnaryService<super::ProtoUpdateJobStatusReq>
                        for UpdateJobStatusSvc<T>
                    {
                        type Response = super::ProtoJobResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoUpdateJobStatusReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).update_job_status(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = UpdateJobStatusSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/printfleet.GrpcPrinterFleet/GetStatus" => {
                    #[allow(non_camel_case_types)]
                    struct GetStatusSvc<T: GrpcPrinterFleet>(pub Arc<T>);
                    impl<T: GrpcPrinterFleet> tonic::server::UnaryService<super::ProtoGetStatusReq>
                        for GetStatusSvc<T>
                    {
                        type Response = super::ProtoNodeStatus;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoGetStatusReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).get_status(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = GetStatusSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                _ => Box::pin(async move {
                    Ok(http::Response::builder()
                        .status(200)
                        .header("grpc-status", "12")
                        .header("content-type", "application/grpc")
                        .body(tonic::body::BoxBody::empty())
                        .unwrap())
                }),
            }
        }
    }
    impl<T: GrpcPrinterFleet> Clone for GrpcPrinterFleetServer<T> {
        fn clone(&self) -> Self {
            let inner = self.inner.clone();
            Self { inner }
        }
    }
    impl<T: GrpcPrinterFleet> Clone for _Inner<T> {
        fn clone(&self) -> Self {
            Self(self.0.clone(), self.1.clone())
        }
    }
    impl<T: std::fmt::Debug> std::fmt::Debug for _Inner<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self.0)
        }
    }
    impl<T: GrpcPrinterFleet> tonic::transport::NamedService for GrpcPrinterFleetServer<T> {
        const NAME: &'static str = "printfleet.GrpcPrinterFleet";
    }
}
