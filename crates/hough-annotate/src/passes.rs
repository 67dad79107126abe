//! The two-pass detection policy.

use hough_circles::{HoughError, HoughParams};
use serde::{Deserialize, Serialize};

use crate::draw::MarkerStyle;

/// First pass: tight radius band around 76 px.
pub const NARROW_RADIUS_PASS: HoughParams = HoughParams {
    dp: 1.0,
    min_dist: 20.0,
    edge_threshold: 200.0,
    acc_threshold: 20,
    min_radius: 75,
    max_radius: 77,
};

/// Second pass: same thresholds, radius band 62..=70 px.
pub const WIDE_RADIUS_PASS: HoughParams = HoughParams {
    dp: 1.0,
    min_dist: 20.0,
    edge_threshold: 200.0,
    acc_threshold: 20,
    min_radius: 62,
    max_radius: 70,
};

/// Errors in a user-supplied annotation policy.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("pass `{name}`: {source}")]
    InvalidPass {
        name: String,
        #[source]
        source: HoughError,
    },
    #[error("annotation policy has no passes")]
    EmptyPolicy,
}

/// One named detection run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionPass {
    pub name: String,
    pub params: HoughParams,
}

impl DetectionPass {
    pub fn new(name: impl Into<String>, params: HoughParams) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    pub fn narrow_radius() -> Self {
        Self::new("narrow_radius", NARROW_RADIUS_PASS)
    }

    pub fn wide_radius() -> Self {
        Self::new("wide_radius", WIDE_RADIUS_PASS)
    }
}

/// Ordered detection passes plus the marker style used for every pass.
///
/// All passes detect on the same smoothed intensity image; later passes draw
/// on top of earlier ones.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotationPolicy {
    pub passes: Vec<DetectionPass>,
    #[serde(default)]
    pub style: MarkerStyle,
}

impl Default for AnnotationPolicy {
    fn default() -> Self {
        Self {
            passes: vec![DetectionPass::narrow_radius(), DetectionPass::wide_radius()],
            style: MarkerStyle::default(),
        }
    }
}

impl AnnotationPolicy {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.passes.is_empty() {
            return Err(ConfigError::EmptyPolicy);
        }
        for pass in &self.passes {
            pass.params
                .validate()
                .map_err(|source| ConfigError::InvalidPass {
                    name: pass.name.clone(),
                    source,
                })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_constants_match_the_product_tuples() {
        let narrow = (
            NARROW_RADIUS_PASS.dp,
            NARROW_RADIUS_PASS.min_dist,
            NARROW_RADIUS_PASS.edge_threshold,
            NARROW_RADIUS_PASS.acc_threshold,
            NARROW_RADIUS_PASS.min_radius,
            NARROW_RADIUS_PASS.max_radius,
        );
        assert_eq!(narrow, (1.0, 20.0, 200.0, 20, 75, 77));

        let wide = (
            WIDE_RADIUS_PASS.dp,
            WIDE_RADIUS_PASS.min_dist,
            WIDE_RADIUS_PASS.edge_threshold,
            WIDE_RADIUS_PASS.acc_threshold,
            WIDE_RADIUS_PASS.min_radius,
            WIDE_RADIUS_PASS.max_radius,
        );
        assert_eq!(wide, (1.0, 20.0, 200.0, 20, 62, 70));
    }

    #[test]
    fn default_policy_runs_narrow_then_wide() {
        let policy = AnnotationPolicy::default();
        assert!(policy.validate().is_ok());
        let radii: Vec<_> = policy
            .passes
            .iter()
            .map(|p| (p.params.min_radius, p.params.max_radius))
            .collect();
        assert_eq!(radii, vec![(75, 77), (62, 70)]);
    }

    #[test]
    fn empty_policy_is_rejected() {
        let policy = AnnotationPolicy {
            passes: Vec::new(),
            style: MarkerStyle::default(),
        };
        assert_eq!(policy.validate(), Err(ConfigError::EmptyPolicy));
    }

    #[test]
    fn invalid_pass_is_named_in_the_error() {
        let mut policy = AnnotationPolicy::default();
        policy.passes[1].params.min_radius = 90;
        let err = policy.validate().expect_err("inverted range");
        assert!(matches!(&err, ConfigError::InvalidPass { name, .. } if name == "wide_radius"));
        assert!(err.to_string().contains("wide_radius"));
    }

    #[test]
    fn sub_pixel_resolution_is_rejected() {
        let mut policy = AnnotationPolicy::default();
        policy.passes[0].params.dp = 1e-9;
        let err = policy.validate().expect_err("dp below 1");
        assert!(matches!(
            err,
            ConfigError::InvalidPass {
                source: HoughError::InvalidResolution { .. },
                ..
            }
        ));
    }
}
