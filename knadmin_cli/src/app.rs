use std::{env, path::PathBuf};

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use knadmin_definitions::fields::FIELDS;

use super::{ErrorKind, Result};

fn no_headers<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("no-headers")
        .long("no-headers")
        .help("When using the default output format, don't print headers (default: print headers)")
}

fn autoscaling<'a, 'b>() -> App<'a, 'b> {
    let mut update = SubCommand::with_name("update")
        .about("Update autoscaling config provided by Knative Pod Autoscaler (KPA)")
        .arg(Arg::with_name("scale-to-zero")
            .long("scale-to-zero")
            .help("Enable scale-to-zero if set."))
        .arg(Arg::with_name("no-scale-to-zero")
            .long("no-scale-to-zero")
            .help("Disable scale-to-zero if set."));
    for f in FIELDS.iter().filter(|f| f.takes_value()) {
        update = update.arg(Arg::with_name(f.name)
            .long(f.name)
            .takes_value(true)
            .value_name("VALUE")
            .help(f.help));
    }

    SubCommand::with_name("autoscaling")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .about("Manage autoscaling config")
        .subcommand(SubCommand::with_name("list")
            .about("List autoscaling config provided by Knative Pod Autoscaler (KPA)")
            .arg(no_headers()))
        .subcommand(update)
}

fn domain<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("domain")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .about("Manage route domain")
        .subcommand(SubCommand::with_name("list")
            .about("List Knative route custom domains")
            .arg(no_headers()))
}

fn cdc<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("cdc")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .about("Manage cluster domain claim")
        .subcommand(SubCommand::with_name("create")
            .about("Create Knative cluster domain claim")
            .arg(Arg::with_name("name")
                .required(true)
                .help("Domain name to claim"))
            .arg(Arg::with_name("namespace")
                .long("namespace")
                .takes_value(true)
                .required(true)
                .help("Namespace which is allowed to create a DomainMapping using this ClusterDomainClaim's name.")))
        .subcommand(SubCommand::with_name("delete")
            .about("Delete Knative cluster domain claim")
            .arg(Arg::with_name("name")
                .required(true)
                .help("Domain name of the claim to delete")))
        .subcommand(SubCommand::with_name("list")
            .about("List Knative cluster domain claims")
            .arg(no_headers()))
}

fn registry<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("registry")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .about("Manage registry")
        .subcommand(SubCommand::with_name("list")
            .alias("ls")
            .about("List registry settings with server and username")
            .arg(Arg::with_name("namespace")
                .short("n")
                .long("namespace")
                .takes_value(true)
                .help("Namespace to search, all namespaces if unset"))
            .arg(Arg::with_name("serviceaccount")
                .long("serviceaccount")
                .takes_value(true)
                .help("the service account to save imagePullSecrets"))
            .arg(no_headers()))
}

/// The full kn-admin command line
pub fn build_cli() -> App<'static, 'static> {
    App::new("kn-admin")
        .version(crate_version!())
        .setting(AppSettings::VersionlessSubcommands)
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .setting(AppSettings::DeriveDisplayOrder)
        .global_settings(&[AppSettings::ColoredHelp])
        .about("A plugin of kn client to manage Knative for administrators")
        .arg(Arg::with_name("verbose")
            .short("v")
            .multiple(true)
            .global(true)
            .help("Increase verbosity"))
        .arg(Arg::with_name("debug")
            .short("d")
            .long("debug")
            .global(true)
            .help("Adds line numbers to log statements"))
        .arg(Arg::with_name("kubeconfig")
            .long("kubeconfig")
            .takes_value(true)
            .global(true)
            .help("kubectl config file (default is ~/.kube/config)"))
        .subcommand(autoscaling())
        .subcommand(domain())
        .subcommand(cdc())
        .subcommand(registry())
}

/// Settings shared by every command of one invocation
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdminParams {
    /// Explicit kubeconfig, checked to exist
    pub kubeconfig: Option<PathBuf>,
}

impl AdminParams {
    /// Resolve params from the top level matches
    pub fn from_args(args: &ArgMatches) -> Result<Self> {
        Self::new(args.value_of("kubeconfig"))
    }

    pub fn new(kubeconfig: Option<&str>) -> Result<Self> {
        let raw = match kubeconfig {
            Some(p) if !p.is_empty() => p,
            _ => return Ok(AdminParams::default()),
        };
        let pth = PathBuf::from(raw);
        if pth.exists() {
            return Ok(AdminParams { kubeconfig: Some(pth) });
        }
        if env::split_paths(raw).count() > 1 {
            bail!(ErrorKind::KubeConfigPathList(raw.to_string()));
        }
        bail!(ErrorKind::MissingKubeConfig(raw.to_string()))
    }

    /// Export an explicit kubeconfig so the kube client loads it
    pub fn init(&self) {
        if let Some(pth) = &self.kubeconfig {
            debug!("using kubeconfig {}", pth.display());
            env::set_var("KUBECONFIG", pth);
        }
    }
}
