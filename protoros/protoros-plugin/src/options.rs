use protoros_core::{DecodeError, EnumRepr, MappingPolicy};

/// Settings carried by the request's `parameter` string.
///
/// The parameter is a comma-separated list of `key[=value]` entries, as
/// passed by `protoc --msg_opt=strict,enum_repr=int32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PluginOptions {
    /// Fail the whole invocation on the first per-file error.
    pub strict: bool,
    pub enum_repr: EnumRepr,
}

impl PluginOptions {
    pub fn from_parameter(parameter: &str) -> Result<Self, DecodeError> {
        Self::default().with_parameter(parameter)
    }

    /// Apply `parameter` on top of `self`. Unknown keys are rejected.
    pub fn with_parameter(mut self, parameter: &str) -> Result<Self, DecodeError> {
        for entry in parameter.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (key, value) = match entry.split_once('=') {
                Some((k, v)) => (k.trim(), Some(v.trim())),
                None => (entry, None),
            };
            let invalid = |detail: String| DecodeError::Parameter {
                parameter: entry.to_string(),
                detail,
            };

            match (key, value) {
                ("strict", None) => self.strict = true,
                ("strict", Some(v)) => {
                    self.strict = v
                        .parse()
                        .map_err(|_| invalid(format!("expected true | false, got '{v}'")))?;
                }
                ("enum_repr", Some(v)) => self.enum_repr = v.parse().map_err(invalid)?,
                ("enum_repr", None) => return Err(invalid("missing value".to_string())),
                (other, _) => return Err(invalid(format!("unknown option '{other}'"))),
            }
        }
        Ok(self)
    }

    pub fn mapping_policy(&self) -> MappingPolicy {
        MappingPolicy {
            enum_repr: self.enum_repr,
        }
    }
}
