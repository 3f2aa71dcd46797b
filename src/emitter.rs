//! C++ source rendering for the streaming extractor.
//!
//! Renders a bound [`WindowSpec`] into a self-contained C++ header
//! implementing the same per-window feature math as
//! [`StreamingExtractor`](crate::stream::StreamingExtractor), with every
//! derived size baked in as a compile-time constant and a static buffer in
//! place of any allocation. The emitter itself does no numeric work beyond
//! deriving those constants; all placeholders come from the same
//! [`StreamLayout`] record the in-process extractor runs on.

use std::hash::{DefaultHasher, Hash, Hasher};

use crate::error::{Result, WindowError};
use crate::window::{StreamLayout, WindowSpec};

/// Fully resolved parameter record for one rendered artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderParams {
    layout: StreamLayout,
    guard: String,
}

impl RenderParams {
    /// Derive params from a bound spec, with a guard identifier hashed from
    /// the resolved layout. The same spec always renders the same text.
    pub fn from_spec(spec: &WindowSpec) -> Result<Self> {
        let layout = spec.layout()?;
        let mut hasher = DefaultHasher::new();
        layout.hash(&mut hasher);
        Ok(Self {
            layout,
            guard: format!("{:016X}", hasher.finish()),
        })
    }

    /// Derive params with a caller-supplied guard identifier instead of the
    /// layout hash.
    ///
    /// The name must be a valid C identifier fragment (letters, digits,
    /// underscores, not starting with a digit).
    pub fn named(spec: &WindowSpec, name: &str) -> Result<Self> {
        let layout = spec.layout()?;
        let mut chars = name.chars();
        let valid = match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        };
        if !valid {
            return Err(WindowError::InvalidParameter(format!(
                "'{name}' is not a valid identifier"
            )));
        }
        Ok(Self {
            layout,
            guard: name.to_string(),
        })
    }

    /// The derived layout behind this render.
    pub fn layout(&self) -> &StreamLayout {
        &self.layout
    }

    /// The guard/class identifier suffix.
    pub fn guard(&self) -> &str {
        &self.guard
    }

    /// Substitute this record into the header template.
    pub fn render(&self) -> String {
        let substitutions = [
            ("id", self.guard.clone()),
            ("num_features", self.layout.num_features.to_string()),
            ("features_count", self.layout.feature_count.to_string()),
            ("length", self.layout.length.to_string()),
            ("size", self.layout.buffer_len.to_string()),
            ("shift", self.layout.shift_scalars.to_string()),
            ("overlap", self.layout.overlap_scalars.to_string()),
        ];

        let mut out = TEMPLATE.to_string();
        for (key, value) in &substitutions {
            out = out.replace(&format!("{{{{ {key} }}}}"), value);
        }
        debug_assert!(!out.contains("{{"), "unresolved template placeholder");
        out
    }
}

/// Render a bound spec into C++ header text.
///
/// The guard identifier is a stable hash of the resolved parameters, so
/// repeated renders of the same spec are byte-identical.
pub fn render(spec: &WindowSpec) -> Result<String> {
    Ok(RenderParams::from_spec(spec)?.render())
}

/// Render with an explicit guard/class identifier.
pub fn render_named(spec: &WindowSpec, name: &str) -> Result<String> {
    Ok(RenderParams::named(spec, name)?.render())
}

const TEMPLATE: &str = r#"#ifndef __WINDOW__{{ id }}
#define __WINDOW__{{ id }}

#include <stdint.h>
#include <string.h>
#include <math.h>

class Window_{{ id }} {
    public:
        const uint16_t features_count = {{ features_count }};
        float features[{{ features_count }}];

        /**
         * Feed one sample of {{ num_features }} scalars.
         * Returns true when a window completed and features[] holds the
         * freshly computed vector (also copied to dest, if given).
         */
        bool transform(float *x, float *dest = NULL) {
            // append sample to queue
            memcpy(queue + head, x, sizeof(float) * {{ num_features }});
            head += {{ num_features }};

            if (head != {{ size }}) {
                return false;
            }

            // extract features for each axis
            uint16_t feature_idx = 0;

            for (uint16_t j = 0; j < {{ num_features }}; j++) {
                float m = queue[j];
                float M = m;
                float abs_m = fabsf(m);
                float abs_M = abs_m;
                float mean = m;
                float std = 0;
                float count_above_mean = 0;
                float count_below_mean = 0;

                // first pass: extrema and mean
                for (uint16_t i = j + {{ num_features }}; i < {{ size }}; i += {{ num_features }}) {
                    float xi = queue[i];
                    float abs_xi = fabsf(xi);

                    mean += xi;

                    if (xi < m) m = xi;
                    if (xi > M) M = xi;
                    if (abs_xi < abs_m) abs_m = abs_xi;
                    if (abs_xi > abs_M) abs_M = abs_xi;
                }

                mean /= {{ length }};

                // second pass: mean-dependent statistics
                for (uint16_t i = j; i < {{ size }}; i += {{ num_features }}) {
                    float xi = queue[i];

                    std += (xi - mean) * (xi - mean);

                    if (xi > mean) count_above_mean += 1;
                    else count_below_mean += 1;
                }

                std = sqrtf(std / {{ length }});

                features[feature_idx++] = m;
                features[feature_idx++] = M;
                features[feature_idx++] = abs_m;
                features[feature_idx++] = abs_M;
                features[feature_idx++] = mean;
                features[feature_idx++] = std;
                features[feature_idx++] = count_above_mean;
                features[feature_idx++] = count_below_mean;
            }

            // copy to dest, if any
            if (dest != NULL) memcpy(dest, features, sizeof(float) * {{ features_count }});

            // keep the newest overlap scalars, drop the rest
            memmove(queue, queue + {{ shift }}, sizeof(float) * {{ overlap }});
            head = {{ overlap }};

            return true;
        }

    protected:
        uint16_t head = 0;
        float queue[{{ size }}];
};

#endif
"#;
