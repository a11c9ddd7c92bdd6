use std::io::Write;

use k8s_openapi::api::core::v1::Secret;
use knadmin_definitions::{registry, RegistryQuery};

use super::{printer::Table, AdminKube, Result, ResultExt};

/// Render registry rows, with a namespace column when listing everywhere
pub fn print_list(secrets: &[Secret], query: &RegistryQuery, no_headers: bool, w: &mut impl Write) -> Result<()> {
    let with_ns = query.all_namespaces();
    let mut headers = vec![];
    if with_ns {
        headers.push("Namespace");
    }
    headers.extend_from_slice(&["ServiceAccount", "Secret", "UserName", "Server", "Email"]);

    let mut table = Table::new(&headers).no_headers(no_headers);
    for r in registry::rows(secrets, query)? {
        let mut cells = vec![];
        if with_ns {
            cells.push(r.namespace);
        }
        cells.extend(vec![r.service_account, r.secret, r.username, r.server, r.email]);
        table.add_row(cells);
    }
    table.print(w)
}

/// `kn-admin registry list`
pub async fn list(kube: &AdminKube, query: &RegistryQuery, no_headers: bool) -> Result<()> {
    let available = kube
        .list_namespaces()
        .await
        .chain_err(|| "failed to search specified namespaces")?;
    let namespaces = query
        .select_namespaces(available)
        .chain_err(|| "failed to search specified namespaces")?;

    let mut secrets = vec![];
    for ns in &namespaces {
        secrets.extend(kube.list_registry_secrets(ns).await?);
    }
    print_list(&secrets, query, no_headers, &mut std::io::stdout())
}
