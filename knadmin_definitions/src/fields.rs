use super::{Duration, ErrorKind, Result, ResultExt};

/// Shortest window the autoscaler accepts
pub const WINDOW_MIN: Duration = Duration::from_secs(6);
/// Longest window the autoscaler accepts
pub const WINDOW_MAX: Duration = Duration::from_secs(3600);

/// How a field value is checked and normalised before it is stored
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// `true` / `false`, driven by a pair of on/off flags
    Bool,
    /// Duration within [WINDOW_MIN; WINDOW_MAX] at second precision
    Window,
    /// Duration of at least WINDOW_MIN
    GracePeriod,
    /// Non-negative duration
    RetentionPeriod,
    /// Decimal strictly greater than 1
    Rate,
    /// Non-negative decimal or -1 for unlimited
    BurstCapacity,
    /// Decimal of at least 1
    ActivatorCapacity,
    /// Stored verbatim
    Opaque,
}

/// A well known key of the autoscaler config map
#[derive(Debug)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Value the autoscaler falls back to when the key is absent
    pub default: &'static str,
    pub help: &'static str,
}

macro_rules! field {
    ($name:expr, $kind:ident, $default:expr, $help:expr) => {
        FieldDescriptor {
            name: $name,
            kind: FieldKind::$kind,
            default: $default,
            help: $help,
        }
    };
}

/// Every autoscaler field this tool can update
pub static FIELDS: [FieldDescriptor; 14] = [
    field!("enable-scale-to-zero", Bool, "true",
        "Enable scale-to-zero if set."),
    field!("requests-per-second-target-default", Opaque, "200",
        "the default target value for requests per second"),
    field!("container-concurrency-target-default", Opaque, "100",
        "the default value of container concurrency target"),
    field!("container-concurrency-target-percentage", Opaque, "70",
        "percentage of the specified target should actually be targeted by the Autoscaler"),
    field!("stable-window", Window, "60s",
        "when operating in a stable mode, the autoscaler operates on the average concurrency over the x seconds of stable window"),
    field!("panic-window-percentage", Opaque, "10",
        "The panic window is defined as a percentage of the stable window"),
    field!("panic-threshold-percentage", Opaque, "200",
        "This threshold defines when the autoscaler will move from stable mode into panic mode"),
    field!("max-scale-up-rate", Rate, "1000",
        "Maximum ratio of desired vs. observed pods"),
    field!("max-scale-down-rate", Rate, "2",
        "Maximum ratio of observed vs. desired pods"),
    field!("scale-to-zero-grace-period", GracePeriod, "30s",
        "the maximum seconds of time that the last pod will remain active after the Autoscaler has decided to scale pods to zero"),
    field!("scale-to-zero-pod-retention-period", RetentionPeriod, "0s",
        "the minimum seconds of time that the last pod will remain active after the Autoscaler has decided to scale pods to zero"),
    field!("target-burst-capacity", BurstCapacity, "200",
        "the desired burst capacity for the revision"),
    field!("pod-autoscaler-class", Opaque, "kpa.autoscaling.knative.dev",
        "the config of Knative autoscaling to work with either the default KPA or a CPU based metric, i.e. Horizontal Pod Autoscaler (HPA)"),
    field!("activator-capacity", ActivatorCapacity, "100",
        "number of the concurrent requests an activator task can accept"),
];

/// Look up a field by its config map key
pub fn descriptor(name: &str) -> Option<&'static FieldDescriptor> {
    FIELDS.iter().find(|f| f.name == name)
}

/// Validate a raw value for a named field and return its storage form
pub fn validate(name: &str, raw: &str) -> Result<String> {
    match descriptor(name) {
        Some(d) => d.validate(raw),
        None => bail!(ErrorKind::UnknownField(name.to_string())),
    }
}

/// Parse a boolean the way the autoscaler reads config maps
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

impl FieldDescriptor {
    /// Whether the field is set through a value flag (`--name value`)
    pub fn takes_value(&self) -> bool {
        self.kind != FieldKind::Bool
    }

    fn reject(&self, detail: String) -> ErrorKind {
        ErrorKind::InvalidField(self.name.to_string(), detail)
    }

    // finite decimals only, so the range checks below never see NaN
    fn decimal(&self, raw: &str) -> Result<f64> {
        let unparsable = || self.reject(format!("failed to parse {} value {}", self.name, raw));
        let v = raw.parse::<f64>().chain_err(unparsable)?;
        if !v.is_finite() {
            bail!(unparsable());
        }
        Ok(v)
    }

    fn duration(&self, raw: &str) -> Result<Duration> {
        Ok(raw.parse::<Duration>()?)
    }

    /// Accept or reject a raw value, returning the canonical stored string
    pub fn validate(&self, raw: &str) -> Result<String> {
        trace!("validating {} = {}", self.name, raw);
        let name = self.name;
        match self.kind {
            FieldKind::Bool => match parse_bool(raw) {
                Some(b) => Ok(b.to_string()),
                None => bail!(self.reject(format!("{} = {}, must be true or false", name, raw))),
            },
            FieldKind::Window => {
                let d = self.duration(raw)?;
                if d < WINDOW_MIN || d > WINDOW_MAX {
                    bail!(self.reject(format!(
                        "{} = {}, must be in [{}; {}] range",
                        name, d, WINDOW_MIN, WINDOW_MAX
                    )));
                }
                if !d.is_whole_seconds() {
                    bail!(self.reject(format!(
                        "{} = {}, must be specified with at most second precision",
                        name, d
                    )));
                }
                Ok(d.to_seconds_string())
            }
            FieldKind::GracePeriod => {
                let d = self.duration(raw)?;
                if d < WINDOW_MIN {
                    bail!(self.reject(format!("{} must be at least {}, got {}", name, WINDOW_MIN, d)));
                }
                Ok(d.to_seconds_string())
            }
            FieldKind::RetentionPeriod => {
                let d = self.duration(raw)?;
                if d.is_negative() {
                    bail!(self.reject(format!("{} cannot be negative, was: {}", name, d)));
                }
                Ok(d.to_seconds_string())
            }
            FieldKind::Rate => {
                if self.decimal(raw)? <= 1.0 {
                    bail!(self.reject(format!("{} = {}, must be greater than 1.0", name, raw)));
                }
                Ok(raw.to_string())
            }
            FieldKind::BurstCapacity => {
                let v = self.decimal(raw)?;
                if v < 0.0 && (v - -1.0).abs() > std::f64::EPSILON {
                    bail!(self.reject(format!(
                        "{} must be either non-negative or -1 (for unlimited), got {}",
                        name, raw
                    )));
                }
                Ok(raw.to_string())
            }
            FieldKind::ActivatorCapacity => {
                if self.decimal(raw)? < 1.0 {
                    bail!(self.reject(format!("{} = {}, must be at least 1", name, raw)));
                }
                Ok(raw.to_string())
            }
            FieldKind::Opaque => Ok(raw.to_string()),
        }
    }
}
