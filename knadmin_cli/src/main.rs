#[macro_use] extern crate log;

use clap::ArgMatches;
use knadmin::*;
use knadmin_definitions::RegistryQuery;
use std::process;

fn print_error_debug(e: &Error) {
    // unwind the error chain
    for e in e.iter().skip(1) {
        warn!("caused by: {}", e);
    }
}

#[tokio::main]
async fn main() {
    let args = app::build_cli().get_matches();
    let name = args.subcommand_name().unwrap_or("kn-admin").to_string();
    if let Err(e) = run(&args).await {
        error!("{} error: {}", name, e);
        print_error_debug(&e);
        process::exit(1);
    }
    process::exit(0);
}

async fn run(args: &ArgMatches<'_>) -> Result<()> {
    // initialise deps and set log default - always show INFO messages (+1)
    loggerv::Logger::new()
        .verbosity(args.occurrences_of("verbose") + 1)
        .module_path(true)
        .line_numbers(args.is_present("debug"))
        .init()?;

    // Ignore SIGPIPE errors to avoid having to use let _ = write! everywhere
    // See https://github.com/rust-lang/rust/issues/46016
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }

    let params = AdminParams::from_args(args)?;
    params.init();

    dispatch_commands(args, &params).await
}

/// Dispatch clap arguments to kn-admin handlers
async fn dispatch_commands(args: &ArgMatches<'_>, params: &AdminParams) -> Result<()> {
    if let Some(a) = args.subcommand_matches("autoscaling") {
        if let Some(b) = a.subcommand_matches("list") {
            let kube = AdminKube::new(params).await?;
            return autoscaling::list(&kube, b.is_present("no-headers")).await;
        }
        if let Some(b) = a.subcommand_matches("update") {
            // flag checks need no cluster
            let opts = autoscaling::update_from_args(b);
            opts.validate()?;
            let kube = AdminKube::new(params).await?;
            return autoscaling::update(&kube, &opts).await;
        }
    }
    else if let Some(a) = args.subcommand_matches("domain") {
        if let Some(b) = a.subcommand_matches("list") {
            let kube = AdminKube::new(params).await?;
            return domain::list(&kube, b.is_present("no-headers")).await;
        }
    }
    else if let Some(a) = args.subcommand_matches("cdc") {
        if let Some(b) = a.subcommand_matches("create") {
            let name = b.value_of("name").unwrap_or_default();
            let ns = b.value_of("namespace").unwrap_or_default();
            let kube = AdminKube::new(params).await?;
            return cdc::create(&kube, name, ns).await;
        }
        if let Some(b) = a.subcommand_matches("delete") {
            let name = b.value_of("name").unwrap_or_default();
            let kube = AdminKube::new(params).await?;
            return cdc::delete(&kube, name).await;
        }
        if let Some(b) = a.subcommand_matches("list") {
            let kube = AdminKube::new(params).await?;
            return cdc::list(&kube, b.is_present("no-headers")).await;
        }
    }
    else if let Some(a) = args.subcommand_matches("registry") {
        if let Some(b) = a.subcommand_matches("list") {
            let query = RegistryQuery::new(
                b.value_of("namespace").map(String::from),
                b.value_of("serviceaccount").map(String::from),
            )?;
            let kube = AdminKube::new(params).await?;
            return registry::list(&kube, &query, b.is_present("no-headers")).await;
        }
    }
    unreachable!("Subcommand valid, but not implemented")
}
