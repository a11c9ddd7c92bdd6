use kube_derive::CustomResource;
use regex::Regex;

use super::{ErrorKind, Result};

/// Claim of a domain name for use by DomainMappings in a single namespace
///
/// Cluster scoped, the object name is the claimed domain.
#[derive(CustomResource, Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[kube(
    group = "networking.internal.knative.dev",
    kind = "ClusterDomainClaim",
    version = "v1alpha1"
)]
#[kube(apiextensions = "v1beta1")]
pub struct ClusterDomainClaimSpec {
    /// Namespace allowed to create a DomainMapping using the claimed name
    pub namespace: String,
}

impl ClusterDomainClaimSpec {
    /// Check a claim before it is sent to the cluster
    ///
    /// The name must be a lowercase dns subdomain and the namespace a dns label.
    pub fn validate(&self, name: &str) -> Result<()> {
        let subdomain = Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$").unwrap();
        let label = Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").unwrap();
        if name.len() > 253 || !subdomain.is_match(name) {
            bail!(ErrorKind::InvalidClaim(format!(
                "invalid cluster domain claim name '{}': must be a lowercase DNS subdomain",
                name
            )));
        }
        if self.namespace.is_empty() {
            bail!(ErrorKind::InvalidClaim("cluster domain claim requires a namespace".into()));
        }
        if self.namespace.len() > 63 || !label.is_match(&self.namespace) {
            bail!(ErrorKind::InvalidClaim(format!(
                "invalid namespace '{}': must be a lowercase DNS label",
                self.namespace
            )));
        }
        Ok(())
    }
}

/// One line of `cdc list`
#[derive(Clone, Debug, PartialEq)]
pub struct ClaimRow {
    pub domain: String,
    pub namespace: String,
}

/// Rows in the order the cluster returned the claims
pub fn claim_rows<'a, I>(claims: I) -> Vec<ClaimRow>
where
    I: IntoIterator<Item = (String, &'a ClusterDomainClaimSpec)>,
{
    claims
        .into_iter()
        .map(|(domain, spec)| ClaimRow {
            domain,
            namespace: spec.namespace.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{claim_rows, ClusterDomainClaimSpec};

    fn spec(ns: &str) -> ClusterDomainClaimSpec {
        ClusterDomainClaimSpec { namespace: ns.into() }
    }

    #[test]
    fn valid_claims() {
        assert!(spec("ns1").validate("domain.name").is_ok());
        assert!(spec("default").validate("hello.example.com").is_ok());
        assert!(spec("a").validate("localhost").is_ok());
    }

    #[test]
    fn invalid_claims() {
        let err = spec("ns1").validate("Domain.Name").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid cluster domain claim name 'Domain.Name': must be a lowercase DNS subdomain"
        );
        assert!(spec("ns1").validate("-bad.name").is_err());
        assert!(spec("ns1").validate("bad..name").is_err());
        assert!(spec("ns1").validate(&"a".repeat(254)).is_err());

        let err = spec("").validate("domain.name").unwrap_err();
        assert_eq!(err.to_string(), "cluster domain claim requires a namespace");
        let err = spec("ns.1").validate("domain.name").unwrap_err();
        assert_eq!(err.to_string(), "invalid namespace 'ns.1': must be a lowercase DNS label");
    }

    #[test]
    fn rows_keep_order() {
        let a = spec("ns1");
        let b = spec("ns2");
        let rows = claim_rows(vec![("z.domain".to_string(), &a), ("a.domain".to_string(), &b)]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].domain, "z.domain");
        assert_eq!(rows[0].namespace, "ns1");
        assert_eq!(rows[1].namespace, "ns2");
    }
}
