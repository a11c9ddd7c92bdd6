use std::{collections::BTreeMap, io::Write};

use clap::ArgMatches;
use knadmin_definitions::{fields::FIELDS, AutoscalerConfig, AutoscalingUpdate, ValidatedUpdate};

use super::{
    kubeapi::{CONFIG_AUTOSCALER, KNATIVE_SERVING},
    printer::Table,
    AdminKube, Result, ResultExt,
};

/// Collect the update flags of one `autoscaling update` invocation
pub fn update_from_args(args: &ArgMatches) -> AutoscalingUpdate {
    let mut opts = AutoscalingUpdate::new();
    if args.is_present("scale-to-zero") {
        opts = opts.enable_scale_to_zero();
    }
    if args.is_present("no-scale-to-zero") {
        opts = opts.disable_scale_to_zero();
    }
    for f in FIELDS.iter().filter(|f| f.takes_value()) {
        if let Some(v) = args.value_of(f.name) {
            opts = opts.set(f.name, v);
        }
    }
    opts
}

/// Render the autoscaler settings table from config map data
pub fn print_list(data: &BTreeMap<String, String>, no_headers: bool, w: &mut impl Write) -> Result<()> {
    let cfg = AutoscalerConfig::from_map(data)?;
    let mut table = Table::new(&["Name", "Value"]).no_headers(no_headers);
    for (name, value) in cfg.rows() {
        table.add_row(vec![name, value]);
    }
    table.print(w)
}

/// `kn-admin autoscaling list`
pub async fn list(kube: &AdminKube, no_headers: bool) -> Result<()> {
    let cm = kube
        .get_configmap(CONFIG_AUTOSCALER)
        .await
        .chain_err(|| "failed to get ConfigMaps")?;
    let data = cm.data.unwrap_or_default();
    print_list(&data, no_headers, &mut std::io::stdout())
}

/// `kn-admin autoscaling update`
///
/// Every flag is validated before the cluster is touched, and the config map
/// is only written when at least one value differs.
pub async fn update(kube: &AdminKube, opts: &AutoscalingUpdate) -> Result<()> {
    let changes: ValidatedUpdate = opts.validate()?;
    kube.installation_method().await?.ensure_standalone()?;

    let mut cm = kube
        .get_configmap(CONFIG_AUTOSCALER)
        .await
        .chain_err(|| "failed to get ConfigMaps")?;
    let mut data = cm.data.take().unwrap_or_default();
    let changed = changes.apply_to(&mut data);
    cm.data = Some(data);

    if changed {
        kube.replace_configmap(&cm).await.chain_err(|| {
            format!(
                "failed to update ConfigMap {} in namespace {}",
                CONFIG_AUTOSCALER, KNATIVE_SERVING
            )
        })?;
    } else {
        info!("{} already up to date", CONFIG_AUTOSCALER);
    }
    println!("Updated Knative autoscaling config");
    Ok(())
}
