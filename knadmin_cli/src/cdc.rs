use std::io::Write;

use kube::api::Meta;
use knadmin_definitions::{cdc::claim_rows, ClusterDomainClaim, ClusterDomainClaimSpec};

use super::{printer::Table, AdminKube, Result};

/// `kn-admin cdc create <name> --namespace <ns>`
pub async fn create(kube: &AdminKube, name: &str, namespace: &str) -> Result<()> {
    let spec = ClusterDomainClaimSpec {
        namespace: namespace.to_string(),
    };
    spec.validate(name)?;
    kube.create_claim(name, spec).await?;
    println!("Cluster Domain Claim '{}' created.", name);
    Ok(())
}

/// `kn-admin cdc delete <name>`
pub async fn delete(kube: &AdminKube, name: &str) -> Result<()> {
    kube.delete_claim(name).await?;
    println!("Cluster Domain Claim '{}' deleted.", name);
    Ok(())
}

/// Render the claim table
pub fn print_list(claims: &[ClusterDomainClaim], no_headers: bool, w: &mut impl Write) -> Result<()> {
    let mut table = Table::new(&["Domain Name", "Namespace"]).no_headers(no_headers);
    let rows = claim_rows(claims.iter().map(|c| (Meta::name(c), &c.spec)));
    for r in rows {
        table.add_row(vec![r.domain, r.namespace]);
    }
    table.print(w)
}

/// `kn-admin cdc list`
pub async fn list(kube: &AdminKube, no_headers: bool) -> Result<()> {
    let claims = kube.list_claims().await?;
    print_list(&claims, no_headers, &mut std::io::stdout())
}
