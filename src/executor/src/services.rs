use crate::apply::Executor;
use crate::report::{Operation, Outcome};
use psdelta_common::types::{Action, ServiceDelta, ServiceNamed, ServiceStatus};
use psdelta_extracts::order_for_stop;
use std::collections::HashMap;
use tracing::{error, info, warn};

fn label(service: &ServiceDelta) -> String {
    if service.display_name.is_empty() || service.display_name == service.service_name {
        service.service_name.clone()
    } else {
        format!("{} ({})", service.display_name, service.service_name)
    }
}

impl Executor<'_> {
    /// Stops services so that dependents go down before what they depend on.
    pub(crate) fn stop_services(&mut self, action: Action, targets: &[&ServiceDelta]) {
        if targets.is_empty() {
            return;
        }

        let graph = self.providers.services.dependencies().unwrap_or_else(|e| {
            warn!("Failed to read service dependencies, keeping delta order: {:#}", e);
            HashMap::new()
        });

        for service in order_for_stop(targets.iter().copied(), &graph) {
            let outcome = self.stop_service(service);
            self.report
                .record(action, Operation::StopService, service.service_name(), outcome);
        }
    }

    pub(crate) fn start_services(&mut self, action: Action, targets: &[&ServiceDelta]) {
        for service in targets {
            let outcome = self.start_service(service);
            self.report
                .record(action, Operation::StartService, &service.service_name, outcome);
        }
    }

    pub(crate) fn restart_services(&mut self, action: Action, targets: &[&ServiceDelta]) {
        for service in targets {
            let outcome = self.restart_service(service);
            self.report
                .record(action, Operation::RestartService, &service.service_name, outcome);
        }
    }

    /// True when a live query says the service is already in `target`. A failed
    /// query is only a warning; the operation is still attempted.
    fn already(&self, service: &ServiceDelta, target: ServiceStatus) -> bool {
        match self.providers.services.query_status(&service.service_name) {
            Ok(status) => status == target,
            Err(e) => {
                warn!("Could not query service {}: {:#}", label(service), e);
                false
            }
        }
    }

    fn stop_service(&self, service: &ServiceDelta) -> Outcome {
        if self.already(service, ServiceStatus::Stopped) {
            info!("Service {} is already stopped.", label(service));
            return Outcome::AlreadyInState;
        }
        if !self.approved(&format!("Do you want to stop service {}?", label(service))) {
            return Outcome::Declined;
        }

        let outcome = match self.providers.services.stop(&service.service_name) {
            Ok(()) => {
                info!("Stopped service {}.", label(service));
                Outcome::Completed
            }
            Err(e) => {
                error!("Could not stop service {}: {:#}", label(service), e);
                Outcome::Failed(format!("{:#}", e))
            }
        };
        self.pause(format_args!("after stopping service {}", label(service)));
        outcome
    }

    fn start_service(&self, service: &ServiceDelta) -> Outcome {
        if self.already(service, ServiceStatus::Running) {
            info!("Service {} is already running.", label(service));
            return Outcome::AlreadyInState;
        }
        if !self.approved(&format!("Do you want to start service {}?", label(service))) {
            return Outcome::Declined;
        }

        let outcome = match self.providers.services.start(&service.service_name) {
            Ok(()) => {
                info!("Started service {}.", label(service));
                Outcome::Completed
            }
            Err(e) => {
                error!("Could not start service {}: {:#}", label(service), e);
                Outcome::Failed(format!("{:#}", e))
            }
        };
        self.pause(format_args!("after starting service {}", label(service)));
        outcome
    }

    fn restart_service(&self, service: &ServiceDelta) -> Outcome {
        if !self.approved(&format!("Do you want to restart service {}?", label(service))) {
            return Outcome::Declined;
        }

        let outcome = match self.providers.services.restart(&service.service_name) {
            Ok(()) => {
                info!("Restarted service {}.", label(service));
                Outcome::Completed
            }
            Err(e) => {
                error!("Could not restart service {}: {:#}", label(service), e);
                Outcome::Failed(format!("{:#}", e))
            }
        };
        self.pause(format_args!("after restarting service {}", label(service)));
        outcome
    }
}
