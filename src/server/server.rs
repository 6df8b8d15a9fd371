use crate::consensus::Leadership;
use crate::grpc::grpc_printer_fleet_server::{GrpcPrinterFleet, GrpcPrinterFleetServer};
use crate::grpc::{
    proto_job_result, proto_printer_result, ProtoCreatePrinterReq, ProtoFleetError, ProtoGetJobReq, ProtoGetPrinterReq,
    ProtoGetStatusReq, ProtoJobList, ProtoJobResult, ProtoListJobsReq, ProtoListPrintersReq, ProtoNodeStatus,
    ProtoPrintJob, ProtoPrinter, ProtoPrinterList, ProtoPrinterResult, ProtoSubmitJobReq, ProtoUpdateJobStatusReq,
    ProtoUpdatePrinterStatusReq,
};
use crate::model::{JobId, JobStatus, PrintJob, Printer, PrinterId, PrinterStatus};
use crate::pipeline::PipelineError;
use crate::server::RpcServerShutdownSignal;
use crate::state_machine::ValidationError;
use crate::FleetNode;
use std::net::SocketAddr;
use tonic::transport::Server;
use tonic::{Request, Response, Status};

/// RpcServer is the type that implements the fleet's gRPC interface.
pub struct RpcServer {
    logger: slog::Logger,
    node_id: String,
    node: FleetNode,
}

impl RpcServer {
    pub fn new(logger: slog::Logger, node_id: String, node: FleetNode) -> Self {
        RpcServer { logger, node_id, node }
    }

    pub async fn run(self, socket_addr: SocketAddr, shutdown_signal: RpcServerShutdownSignal) {
        let logger = self.logger.clone();
        slog::info!(logger, "Listening on '{:?}'", socket_addr);

        let result = Server::builder()
            .add_service(GrpcPrinterFleetServer::new(self))
            .serve_with_shutdown(socket_addr, shutdown_signal)
            .await;

        slog::info!(logger, "Server run() has exited: {:?}", result);
    }

    fn printer_result(result: Result<Printer, PipelineError>) -> ProtoPrinterResult {
        let result = match result {
            Ok(printer) => proto_printer_result::Result::Ok(convert_printer(printer)),
            Err(e) => proto_printer_result::Result::Err(convert_error(&e)),
        };

        ProtoPrinterResult { result: Some(result) }
    }

    fn job_result(result: Result<PrintJob, PipelineError>) -> ProtoJobResult {
        let result = match result {
            Ok(job) => proto_job_result::Result::Ok(convert_job(job)),
            Err(e) => proto_job_result::Result::Err(convert_error(&e)),
        };

        ProtoJobResult { result: Some(result) }
    }

    fn node_status(&self) -> ProtoNodeStatus {
        let (role, leader_id, leader_address) = match self.node.pipeline().leadership() {
            Leadership::Leader => ("leader", self.node_id.clone(), String::new()),
            Leadership::Follower(leader) => (
                "follower",
                leader.node_id,
                leader.address.map(|a| a.to_string()).unwrap_or_default(),
            ),
            Leadership::NoLeader => ("no_leader", String::new(), String::new()),
        };

        ProtoNodeStatus {
            node_id: self.node_id.clone(),
            role: role.to_string(),
            leader_id,
            leader_address,
        }
    }
}

#[async_trait::async_trait]
impl GrpcPrinterFleet for RpcServer {
    async fn create_printer(
        &self,
        rpc_request_wrapped: Request<ProtoCreatePrinterReq>,
    ) -> Result<Response<ProtoPrinterResult>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request);

        let app_result = self
            .node
            .pipeline()
            .create_printer(rpc_request.name, rpc_request.filament_weight)
            .await;

        Ok(Response::new(Self::printer_result(app_result)))
    }

    async fn get_printer(
        &self,
        rpc_request_wrapped: Request<ProtoGetPrinterReq>,
    ) -> Result<Response<ProtoPrinterResult>, Status> {
        let printer_id = convert_printer_id(rpc_request_wrapped.into_inner().printer_id)?;

        let app_result = self
            .node
            .pipeline()
            .get_printer(&printer_id)
            .ok_or_else(|| PipelineError::Invalid(ValidationError::PrinterNotFound(printer_id)));

        Ok(Response::new(Self::printer_result(app_result)))
    }

    async fn list_printers(
        &self,
        _: Request<ProtoListPrintersReq>,
    ) -> Result<Response<ProtoPrinterList>, Status> {
        let printers = self
            .node
            .pipeline()
            .list_printers()
            .into_iter()
            .map(convert_printer)
            .collect();

        Ok(Response::new(ProtoPrinterList { printers }))
    }

    async fn update_printer_status(
        &self,
        rpc_request_wrapped: Request<ProtoUpdatePrinterStatusReq>,
    ) -> Result<Response<ProtoPrinterResult>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request);

        let printer_id = convert_printer_id(rpc_request.printer_id)?;
        let status = rpc_request
            .status
            .parse::<PrinterStatus>()
            .map_err(|e| Status::invalid_argument(e.to_string()))?;
        let job_id = match rpc_request.job_id.as_str() {
            "" => None,
            _ => Some(JobId::new(rpc_request.job_id)),
        };

        let app_result = self
            .node
            .pipeline()
            .update_printer_status(printer_id, status, job_id)
            .await;

        Ok(Response::new(Self::printer_result(app_result)))
    }

    async fn submit_job(&self, rpc_request_wrapped: Request<ProtoSubmitJobReq>) -> Result<Response<ProtoJobResult>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request);

        let printer_id = convert_printer_id(rpc_request.printer_id)?;
        let app_result = self
            .node
            .pipeline()
            .submit_job(printer_id, rpc_request.filament_weight)
            .await;

        Ok(Response::new(Self::job_result(app_result)))
    }

    async fn get_job(&self, rpc_request_wrapped: Request<ProtoGetJobReq>) -> Result<Response<ProtoJobResult>, Status> {
        let job_id = convert_job_id(rpc_request_wrapped.into_inner().job_id)?;

        let app_result = self
            .node
            .pipeline()
            .get_job(&job_id)
            .ok_or_else(|| PipelineError::Invalid(ValidationError::JobNotFound(job_id)));

        Ok(Response::new(Self::job_result(app_result)))
    }

    async fn list_jobs(&self, _: Request<ProtoListJobsReq>) -> Result<Response<ProtoJobList>, Status> {
        let jobs = self
            .node
            .pipeline()
            .list_jobs()
            .into_iter()
            .map(convert_job)
            .collect();

        Ok(Response::new(ProtoJobList { jobs }))
    }

    async fn update_job_status(
        &self,
        rpc_request_wrapped: Request<ProtoUpdateJobStatusReq>,
    ) -> Result<Response<ProtoJobResult>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request);

        let job_id = convert_job_id(rpc_request.job_id)?;
        let status = rpc_request
            .status
            .parse::<JobStatus>()
            .map_err(|e| Status::invalid_argument(e.to_string()))?;

        let app_result = self.node.pipeline().update_job_status(job_id, status).await;

        Ok(Response::new(Self::job_result(app_result)))
    }

    async fn get_status(&self, _: Request<ProtoGetStatusReq>) -> Result<Response<ProtoNodeStatus>, Status> {
        Ok(Response::new(self.node_status()))
    }
}

// ------- Conversions --------

fn convert_printer_id(printer_id: String) -> Result<PrinterId, Status> {
    if printer_id.is_empty() {
        return Err(Status::invalid_argument("printer_id is required"));
    }
    Ok(PrinterId::new(printer_id))
}

fn convert_job_id(job_id: String) -> Result<JobId, Status> {
    if job_id.is_empty() {
        return Err(Status::invalid_argument("job_id is required"));
    }
    Ok(JobId::new(job_id))
}

fn convert_printer(printer: Printer) -> ProtoPrinter {
    ProtoPrinter {
        id: printer.id.into_inner(),
        name: printer.name,
        status: printer.status.as_str().to_string(),
        filament_weight: printer.filament_weight,
        current_job_id: printer.current_job_id.map(JobId::into_inner).unwrap_or_default(),
    }
}

fn convert_job(job: PrintJob) -> ProtoPrintJob {
    ProtoPrintJob {
        id: job.id.into_inner(),
        status: job.status.as_str().to_string(),
        printer_id: job.printer_id.into_inner(),
        filament_weight: job.filament_weight,
    }
}

fn convert_error(e: &PipelineError) -> ProtoFleetError {
    let code = match e {
        PipelineError::Invalid(v) | PipelineError::RejectedAtApply(v) => validation_code(v),
        PipelineError::NotLeader(_) => "not_leader",
        PipelineError::NoLeader => "no_leader",
        PipelineError::OutcomeUnknown(_) => "outcome_unknown",
        PipelineError::IdConflict(_) => "id_conflict",
        PipelineError::IdSpaceExhausted(_) => "id_space_exhausted",
        PipelineError::NotActivated { .. } => "not_activated",
        PipelineError::Unavailable(_) => "unavailable",
        PipelineError::Encode(_) | PipelineError::Undecodable(_) | PipelineError::UnexpectedOutcome(_) => "internal",
    };
    let (leader_id, leader_address) = match e {
        PipelineError::NotLeader(leader) => (
            leader.node_id.clone(),
            leader.address.map(|a| a.to_string()).unwrap_or_default(),
        ),
        _ => (String::new(), String::new()),
    };

    ProtoFleetError {
        code: code.to_string(),
        message: e.to_string(),
        retryable: e.is_retryable(),
        leader_id,
        leader_address,
    }
}

fn validation_code(e: &ValidationError) -> &'static str {
    match e {
        ValidationError::PrinterNotFound(_) => "printer_not_found",
        ValidationError::JobNotFound(_) => "job_not_found",
        ValidationError::EmptyPrinterName | ValidationError::InvalidFilamentWeight(_) => "invalid_argument",
        ValidationError::PrinterBusy { .. } => "printer_busy",
        ValidationError::InsufficientFilament { .. } => "insufficient_filament",
        ValidationError::InvalidTransition { .. } => "invalid_transition",
        ValidationError::JobNotOnPrinter { .. } => "job_not_on_printer",
        ValidationError::JobFinished { .. } => "job_finished",
        ValidationError::DuplicateJob(_) => "duplicate_job",
        ValidationError::NoJobToPrint(_) => "no_job_to_print",
    }
}
