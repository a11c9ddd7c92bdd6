use std::{collections::BTreeMap, io::Write};

use knadmin_definitions::selector;

use super::{
    kubeapi::{CONFIG_DOMAIN, KNATIVE_SERVING},
    printer::Table,
    AdminKube, Result, ResultExt,
};

/// Render the custom domain table from `config-domain` data
pub fn print_list(data: &BTreeMap<String, String>, no_headers: bool, w: &mut impl Write) -> Result<()> {
    let mut table = Table::new(&["Custom-Domain", "Selector"]).no_headers(no_headers);
    for (domain, sel) in selector::domain_rows(data) {
        table.add_row(vec![domain, sel]);
    }
    table.print(w)
}

/// `kn-admin domain list`
pub async fn list(kube: &AdminKube, no_headers: bool) -> Result<()> {
    let cm = kube.get_configmap(CONFIG_DOMAIN).await.chain_err(|| {
        format!("failed to get ConfigMap {} in namespace {}", CONFIG_DOMAIN, KNATIVE_SERVING)
    })?;
    let data = cm.data.unwrap_or_default();
    print_list(&data, no_headers, &mut std::io::stdout())
}
