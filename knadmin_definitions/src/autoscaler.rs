use std::collections::BTreeMap;

use super::{fields, Duration, ErrorKind, Result, ResultExt};

/// Config map key toggled by `--scale-to-zero` / `--no-scale-to-zero`
pub const SCALE_TO_ZERO: &str = "enable-scale-to-zero";

/// Options for a single `autoscaling update` invocation
///
/// Built fresh from the parsed flags of one command execution. Nothing is
/// validated until `validate` is called, which checks every supplied field
/// before any of them can be written.
#[derive(Clone, Debug, Default)]
pub struct AutoscalingUpdate {
    pub scale_to_zero: bool,
    pub no_scale_to_zero: bool,
    /// (field, raw value) in the order they were given
    pub values: Vec<(String, String)>,
}

/// The canonical changes produced by a successful validation
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedUpdate {
    changes: BTreeMap<String, String>,
}

impl AutoscalingUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a raw value for a field
    pub fn set(mut self, field: &str, raw: &str) -> Self {
        self.values.push((field.to_string(), raw.to_string()));
        self
    }

    pub fn enable_scale_to_zero(mut self) -> Self {
        self.scale_to_zero = true;
        self
    }

    pub fn disable_scale_to_zero(mut self) -> Self {
        self.no_scale_to_zero = true;
        self
    }

    pub fn is_empty(&self) -> bool {
        !self.scale_to_zero && !self.no_scale_to_zero && self.values.is_empty()
    }

    /// Check every requested change, all or nothing
    pub fn validate(&self) -> Result<ValidatedUpdate> {
        if self.is_empty() {
            bail!(ErrorKind::MissingFlags("autoscaling update".into()));
        }
        if self.scale_to_zero && self.no_scale_to_zero {
            bail!(ErrorKind::ConflictingFlags("scale-to-zero".into(), "no-scale-to-zero".into()));
        }
        let mut changes = BTreeMap::new();
        if self.scale_to_zero {
            changes.insert(SCALE_TO_ZERO.to_string(), "true".to_string());
        }
        if self.no_scale_to_zero {
            changes.insert(SCALE_TO_ZERO.to_string(), "false".to_string());
        }
        for (field, raw) in &self.values {
            let canonical = fields::validate(field, raw)?;
            changes.insert(field.clone(), canonical);
        }
        Ok(ValidatedUpdate { changes })
    }
}

impl ValidatedUpdate {
    pub fn changes(&self) -> &BTreeMap<String, String> {
        &self.changes
    }

    /// Write the changes into a config map's data
    ///
    /// Keys that already hold the wanted value are left untouched.
    /// Returns whether anything changed.
    pub fn apply_to(&self, data: &mut BTreeMap<String, String>) -> bool {
        let mut changed = false;
        for (k, v) in &self.changes {
            if data.get(k) != Some(v) {
                debug!("setting {} = {}", k, v);
                data.insert(k.clone(), v.clone());
                changed = true;
            }
        }
        changed
    }
}

/// Typed view of the `config-autoscaler` config map
///
/// Absent keys take the defaults listed in `fields::FIELDS`.
#[derive(Clone, Debug, PartialEq)]
pub struct AutoscalerConfig {
    pub enable_scale_to_zero: bool,
    pub container_concurrency_target_percentage: f64,
    pub container_concurrency_target_default: f64,
    pub rps_target_default: f64,
    pub max_scale_up_rate: f64,
    pub max_scale_down_rate: f64,
    pub target_burst_capacity: f64,
    pub panic_window_percentage: f64,
    pub panic_threshold_percentage: f64,
    pub stable_window: Duration,
    pub scale_to_zero_grace_period: Duration,
    pub scale_to_zero_pod_retention_period: Duration,
    pub activator_capacity: f64,
    pub pod_autoscaler_class: String,
}

// Value held in the map, else the field's default
fn lookup<'a>(data: &'a BTreeMap<String, String>, key: &str) -> Result<&'a str> {
    match data.get(key) {
        Some(raw) => Ok(raw.trim()),
        None => match fields::descriptor(key) {
            Some(d) => Ok(d.default),
            None => bail!(ErrorKind::UnknownField(key.to_string())),
        },
    }
}

fn read_float(data: &BTreeMap<String, String>, key: &str) -> Result<f64> {
    let raw = lookup(data, key)?;
    raw.parse::<f64>().chain_err(|| format!("failed to parse {}: {}", key, raw))
}

fn read_duration(data: &BTreeMap<String, String>, key: &str) -> Result<Duration> {
    let raw = lookup(data, key)?;
    raw.parse::<Duration>().chain_err(|| format!("failed to parse {}: {}", key, raw))
}

// Listed keys, sorted by name
static LISTED: [&str; 13] = [
    "activator-capacity",
    "container-concurrency-target-default",
    "enable-scale-to-zero",
    "max-scale-down-rate",
    "max-scale-up-rate",
    "panic-threshold-percentage",
    "panic-window-percentage",
    "pod-autoscaler-class",
    "requests-per-second-target-default",
    "scale-to-zero-grace-period",
    "scale-to-zero-pod-retention-period",
    "stable-window",
    "target-burst-capacity",
];

impl AutoscalerConfig {
    /// Parse a config map's data, falling back to defaults for absent keys
    pub fn from_map(data: &BTreeMap<String, String>) -> Result<Self> {
        Self::parse(data).chain_err(|| "failed to get autoscaling config")
    }

    fn parse(data: &BTreeMap<String, String>) -> Result<Self> {
        let raw = lookup(data, SCALE_TO_ZERO)?;
        let enable_scale_to_zero = match fields::parse_bool(raw) {
            Some(b) => b,
            None => bail!("failed to parse {}: {}", SCALE_TO_ZERO, raw),
        };
        Ok(AutoscalerConfig {
            enable_scale_to_zero,
            container_concurrency_target_percentage: read_float(data, "container-concurrency-target-percentage")?,
            container_concurrency_target_default: read_float(data, "container-concurrency-target-default")?,
            rps_target_default: read_float(data, "requests-per-second-target-default")?,
            max_scale_up_rate: read_float(data, "max-scale-up-rate")?,
            max_scale_down_rate: read_float(data, "max-scale-down-rate")?,
            target_burst_capacity: read_float(data, "target-burst-capacity")?,
            panic_window_percentage: read_float(data, "panic-window-percentage")?,
            panic_threshold_percentage: read_float(data, "panic-threshold-percentage")?,
            stable_window: read_duration(data, "stable-window")?,
            scale_to_zero_grace_period: read_duration(data, "scale-to-zero-grace-period")?,
            scale_to_zero_pod_retention_period: read_duration(data, "scale-to-zero-pod-retention-period")?,
            activator_capacity: read_float(data, "activator-capacity")?,
            pod_autoscaler_class: lookup(data, "pod-autoscaler-class")?.to_string(),
        })
    }

    /// Name / display value pairs for the listed keys, sorted by name
    pub fn rows(&self) -> Vec<(String, String)> {
        LISTED
            .iter()
            .filter_map(|name| self.describe(name).map(|v| (name.to_string(), v)))
            .collect()
    }

    fn describe(&self, name: &str) -> Option<String> {
        let value = match name {
            "activator-capacity" => format!("{:.1}", self.activator_capacity),
            "container-concurrency-target-default" => format!("{:.1}", self.container_concurrency_target_default),
            "enable-scale-to-zero" => self.enable_scale_to_zero.to_string(),
            "max-scale-down-rate" => format!("{:.1}", self.max_scale_down_rate),
            "max-scale-up-rate" => format!("{:.1}", self.max_scale_up_rate),
            "panic-threshold-percentage" => format!("{:.1}", self.panic_threshold_percentage),
            "panic-window-percentage" => format!("{:.1}", self.panic_window_percentage),
            "pod-autoscaler-class" => self.pod_autoscaler_class.clone(),
            "requests-per-second-target-default" => format!("{:.1}", self.rps_target_default),
            "scale-to-zero-grace-period" => self.scale_to_zero_grace_period.describe(),
            "scale-to-zero-pod-retention-period" => self.scale_to_zero_pod_retention_period.describe(),
            "stable-window" => self.stable_window.describe(),
            "target-burst-capacity" => format!("{:.1}", self.target_burst_capacity),
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{AutoscalerConfig, AutoscalingUpdate};
    use crate::{fields, Duration, ErrorKind};
    use std::collections::BTreeMap;

    #[test]
    fn update_requires_flags() {
        let err = AutoscalingUpdate::new().validate().unwrap_err();
        assert_eq!(err.to_string(), "'autoscaling update' requires flag(s)");
    }

    #[test]
    fn scale_to_zero_flags_are_exclusive() {
        let opts = AutoscalingUpdate::new().enable_scale_to_zero().disable_scale_to_zero();
        let err = opts.validate().unwrap_err();
        assert_eq!(err.to_string(), "please specify either --scale-to-zero or --no-scale-to-zero");
        match err.kind() {
            ErrorKind::ConflictingFlags(..) => {}
            k => panic!("unexpected error kind {:?}", k),
        }
    }

    #[test]
    fn update_is_all_or_nothing() {
        let mut data = btreemap! {
            "max-scale-up-rate".to_string() => "1000".to_string(),
        };
        let before = data.clone();
        let opts = AutoscalingUpdate::new()
            .set("max-scale-up-rate", "2.5")
            .set("activator-capacity", "0.5");
        // the first field is fine, the second is not: nothing may be applied
        assert!(opts.validate().is_err());
        assert_eq!(data, before);

        let ok = AutoscalingUpdate::new()
            .set("max-scale-up-rate", "2.5")
            .set("stable-window", "2m")
            .enable_scale_to_zero()
            .validate()
            .unwrap();
        assert!(ok.apply_to(&mut data));
        assert_eq!(data["max-scale-up-rate"], "2.5");
        assert_eq!(data["stable-window"], "120s");
        assert_eq!(data["enable-scale-to-zero"], "true");
    }

    #[test]
    fn unchanged_values_are_not_rewritten() {
        let mut data = btreemap! {
            "enable-scale-to-zero".to_string() => "true".to_string(),
            "unrelated".to_string() => "kept".to_string(),
        };
        let before = data.clone();
        let update = AutoscalingUpdate::new().enable_scale_to_zero().validate().unwrap();
        assert!(!update.apply_to(&mut data));
        assert_eq!(data, before);
    }

    #[test]
    fn config_defaults() {
        let cfg = AutoscalerConfig::from_map(&BTreeMap::new()).unwrap();
        assert!(cfg.enable_scale_to_zero);
        assert_eq!(cfg.container_concurrency_target_percentage, 70.0);
        assert_eq!(cfg.max_scale_up_rate, 1000.0);
        assert_eq!(cfg.max_scale_down_rate, 2.0);
        assert_eq!(cfg.stable_window, Duration::from_secs(60));
        assert_eq!(cfg.scale_to_zero_pod_retention_period, Duration::from_secs(0));
        let rows = cfg.rows();
        assert_eq!(rows.len(), 13);
        let mut names = rows.iter().map(|(n, _)| n.clone()).collect::<Vec<_>>();
        let listed = names.clone();
        names.sort();
        assert_eq!(names, listed);
        assert!(rows.contains(&("stable-window".into(), "1m".into())));
        assert!(rows.contains(&("scale-to-zero-grace-period".into(), "30s".into())));
        assert!(rows.contains(&("scale-to-zero-pod-retention-period".into(), "0s".into())));
        assert!(rows.contains(&("activator-capacity".into(), "100.0".into())));
        assert!(rows.contains(&("enable-scale-to-zero".into(), "true".into())));
        assert!(rows.contains(&("pod-autoscaler-class".into(), "kpa.autoscaling.knative.dev".into())));
    }

    #[test]
    fn field_defaults_are_valid() {
        for f in fields::FIELDS.iter() {
            assert!(f.validate(f.default).is_ok(), "default of {} rejected", f.name);
        }
        // every default is what an empty config map reads back
        let data = fields::FIELDS
            .iter()
            .map(|f| (f.name.to_string(), f.default.to_string()))
            .collect::<BTreeMap<_, _>>();
        assert_eq!(
            AutoscalerConfig::from_map(&data).unwrap(),
            AutoscalerConfig::from_map(&BTreeMap::new()).unwrap()
        );
    }

    #[test]
    fn config_from_map() {
        let data = btreemap! {
            "enable-scale-to-zero".to_string() => "false".to_string(),
            "max-scale-up-rate".to_string() => "100".to_string(),
            "stable-window".to_string() => "3600s".to_string(),
            "target-burst-capacity".to_string() => "-1".to_string(),
        };
        let cfg = AutoscalerConfig::from_map(&data).unwrap();
        assert!(!cfg.enable_scale_to_zero);
        let rows = cfg.rows();
        assert!(rows.contains(&("max-scale-up-rate".into(), "100.0".into())));
        assert!(rows.contains(&("stable-window".into(), "1h".into())));
        assert!(rows.contains(&("target-burst-capacity".into(), "-1.0".into())));
        assert!(rows.contains(&("enable-scale-to-zero".into(), "false".into())));
    }

    #[test]
    fn config_parse_failures() {
        let data = btreemap! { "stable-window".to_string() => "60".to_string() };
        let err = AutoscalerConfig::from_map(&data).unwrap_err();
        assert_eq!(err.to_string(), "failed to get autoscaling config");
        assert_eq!(err.iter().nth(1).unwrap().to_string(), "failed to parse stable-window: 60");

        let data = btreemap! { "enable-scale-to-zero".to_string() => "maybe".to_string() };
        assert!(AutoscalerConfig::from_map(&data).is_err());
    }
}
