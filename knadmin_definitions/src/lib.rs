#![recursion_limit = "1024"]
#![allow(renamed_and_removed_lints)]

#[macro_use]
extern crate serde_derive;

#[macro_use]
extern crate log;

#[cfg(test)]
#[macro_use]
extern crate maplit;

#[macro_use]
extern crate error_chain;
error_chain! {
    types {
        Error, ErrorKind, ResultExt, Result;
    }
    links {}
    foreign_links {
        Fmt(::std::fmt::Error);
        SerdeJ(serde_json::Error);
    }
    errors {
        InvalidDuration(raw: String) {
            description("invalid duration")
            display("invalid duration {}", raw)
        }
        MissingDurationUnit(raw: String) {
            description("missing unit in duration")
            display("missing unit in duration {}", raw)
        }
        UnknownDurationUnit(unit: String, raw: String) {
            description("unknown unit in duration")
            display("unknown unit {} in duration {}", unit, raw)
        }
        UnknownField(field: String) {
            description("unknown autoscaling field")
            display("unknown autoscaling field {}", field)
        }
        InvalidField(field: String, detail: String) {
            description("configuration value rejected")
            display("{}", detail)
        }
        ConflictingFlags(first: String, second: String) {
            description("mutually exclusive flags")
            display("please specify either --{} or --{}", first, second)
        }
        MissingFlags(cmd: String) {
            description("no flags given")
            display("'{}' requires flag(s)", cmd)
        }
        InvalidClaim(detail: String) {
            description("cluster domain claim rejected")
            display("{}", detail)
        }
        OperatorModeNotSupported {
            description("knative is managed by the operator")
            display("Knative managed by operator is not supported yet")
        }
        InstallationMethodUnknown {
            description("installation method could not be detected")
            display("Cannot detect current installation method")
        }
    }
}

/// Go compatible duration parsing and display
pub mod duration;
pub use duration::Duration;

/// Static table of autoscaler fields with validators and canonical codecs
pub mod fields;
pub use fields::{FieldDescriptor, FieldKind};

/// Autoscaler update options and the typed read model
pub mod autoscaler;
pub use autoscaler::{AutoscalerConfig, AutoscalingUpdate, ValidatedUpdate};

/// Custom domain selector formatting
pub mod selector;

/// Image pull registry secrets
pub mod registry;
pub use registry::{RegistryQuery, RegistryRow, RegistrySecret};

/// ClusterDomainClaim custom resource
pub mod cdc;
pub use cdc::{ClaimRow, ClusterDomainClaim, ClusterDomainClaimSpec};

/// How knative serving was installed
mod install;
pub use install::InstallationMethod;
