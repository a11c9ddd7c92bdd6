#![recursion_limit = "1024"]
#![allow(renamed_and_removed_lints)]

#[macro_use]
extern crate log;

#[macro_use]
extern crate clap;

#[macro_use]
extern crate error_chain;
error_chain! {
    types {
        Error, ErrorKind, ResultExt, Result;
    }
    links {
        Def(knadmin_definitions::Error, knadmin_definitions::ErrorKind);
    }
    foreign_links {
        Fmt(::std::fmt::Error);
        Io(::std::io::Error);
        Log(log::SetLoggerError);
    }
    errors {
        KubeError(e: kube::Error) {
            description("kube api interaction failed")
            display("kube api interaction failed: {}", e)
        }
        MissingKubeConfig(path: String) {
            description("kubeconfig file not found")
            display("Config file '{}' can not be found", path)
        }
        KubeConfigPathList(path: String) {
            description("kubeconfig given as a path list")
            display("Can not find config file. '{}' looks like a path. \
                     Please use the env var KUBECONFIG if you want to check for multiple configuration files", path)
        }
    }
}

pub use knadmin_definitions::{AutoscalerConfig, AutoscalingUpdate, Duration};

/// Kube client and the handful of calls every command needs
pub mod kubeapi;
pub use kubeapi::AdminKube;

/// Plain column table output
pub mod printer;

/// Clap definitions and per-invocation params
pub mod app;
pub use app::AdminParams;

/// `kn-admin autoscaling`
pub mod autoscaling;
/// `kn-admin domain`
pub mod domain;
/// `kn-admin cdc`
pub mod cdc;
/// `kn-admin registry`
pub mod registry;
