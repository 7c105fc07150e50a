use std::f64::consts::PI;

const BACK_C1: f64 = 1.70158;
const BACK_C3: f64 = BACK_C1 + 1.0;

fn out_bounce(t: f64) -> f64 {
    const N1: f64 = 7.5625;
    const D1: f64 = 2.75;
    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Ease {
    #[default]
    Linear,
    InSine,
    OutSine,
    InOutSine,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InQuart,
    OutQuart,
    InOutQuart,
    InQuint,
    OutQuint,
    InOutQuint,
    InCirc,
    OutCirc,
    InOutCirc,
    InElastic,
    OutElastic,
    InOutElastic,
    InExpo,
    OutExpo,
    InOutExpo,
    InBack,
    OutBack,
    InOutBack,
    InBounce,
    OutBounce,
    InOutBounce,
}

impl Ease {
    pub const ALL: [Self; 31] = [
        Self::Linear,
        Self::InSine,
        Self::OutSine,
        Self::InOutSine,
        Self::InQuad,
        Self::OutQuad,
        Self::InOutQuad,
        Self::InCubic,
        Self::OutCubic,
        Self::InOutCubic,
        Self::InQuart,
        Self::OutQuart,
        Self::InOutQuart,
        Self::InQuint,
        Self::OutQuint,
        Self::InOutQuint,
        Self::InCirc,
        Self::OutCirc,
        Self::InOutCirc,
        Self::InElastic,
        Self::OutElastic,
        Self::InOutElastic,
        Self::InExpo,
        Self::OutExpo,
        Self::InOutExpo,
        Self::InBack,
        Self::OutBack,
        Self::InOutBack,
        Self::InBounce,
        Self::OutBounce,
        Self::InOutBounce,
    ];

    /// Case-insensitive parse of `inQuad` / `easeInQuad` style names. Unknown names are linear.
    pub fn parse(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        let key = lower.strip_prefix("ease").unwrap_or(&lower);
        match key {
            "linear" => Self::Linear,
            "insine" => Self::InSine,
            "outsine" => Self::OutSine,
            "inoutsine" => Self::InOutSine,
            "inquad" => Self::InQuad,
            "outquad" => Self::OutQuad,
            "inoutquad" => Self::InOutQuad,
            "incubic" => Self::InCubic,
            "outcubic" => Self::OutCubic,
            "inoutcubic" => Self::InOutCubic,
            "inquart" => Self::InQuart,
            "outquart" => Self::OutQuart,
            "inoutquart" => Self::InOutQuart,
            "inquint" => Self::InQuint,
            "outquint" => Self::OutQuint,
            "inoutquint" => Self::InOutQuint,
            "incirc" => Self::InCirc,
            "outcirc" => Self::OutCirc,
            "inoutcirc" => Self::InOutCirc,
            "inelastic" => Self::InElastic,
            "outelastic" => Self::OutElastic,
            "inoutelastic" => Self::InOutElastic,
            "inexpo" => Self::InExpo,
            "outexpo" => Self::OutExpo,
            "inoutexpo" => Self::InOutExpo,
            "inback" => Self::InBack,
            "outback" => Self::OutBack,
            "inoutback" => Self::InOutBack,
            "inbounce" => Self::InBounce,
            "outbounce" => Self::OutBounce,
            "inoutbounce" => Self::InOutBounce,
            _ => {
                tracing::debug!(name, "unknown easing, using linear");
                Self::Linear
            }
        }
    }

    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InSine => 1.0 - (t * PI / 2.0).cos(),
            Self::OutSine => (t * PI / 2.0).sin(),
            Self::InOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::InQuart => t.powi(4),
            Self::OutQuart => 1.0 - (1.0 - t).powi(4),
            Self::InOutQuart => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
            Self::InQuint => t.powi(5),
            Self::OutQuint => 1.0 - (1.0 - t).powi(5),
            Self::InOutQuint => {
                if t < 0.5 {
                    16.0 * t.powi(5)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(5) / 2.0
                }
            }
            Self::InCirc => 1.0 - (1.0 - t * t).sqrt(),
            Self::OutCirc => (1.0 - (t - 1.0).powi(2)).sqrt(),
            Self::InOutCirc => {
                if t < 0.5 {
                    (1.0 - (1.0 - (2.0 * t).powi(2)).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * t + 2.0).powi(2)).sqrt() + 1.0) / 2.0
                }
            }
            Self::InElastic | Self::OutElastic | Self::InOutElastic if t == 0.0 || t == 1.0 => t,
            Self::InElastic => {
                let c4 = 2.0 * PI / 3.0;
                -(2f64.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * c4).sin()
            }
            Self::OutElastic => {
                let c4 = 2.0 * PI / 3.0;
                2f64.powf(-10.0 * t) * ((t * 10.0 - 0.75) * c4).sin() + 1.0
            }
            Self::InOutElastic => {
                let c5 = 2.0 * PI / 4.5;
                if t < 0.5 {
                    -(2f64.powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * c5).sin()) / 2.0
                } else {
                    2f64.powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * c5).sin() / 2.0 + 1.0
                }
            }
            Self::InExpo | Self::OutExpo | Self::InOutExpo if t == 0.0 || t == 1.0 => t,
            Self::InExpo => 2f64.powf(10.0 * t - 10.0),
            Self::OutExpo => 1.0 - 2f64.powf(-10.0 * t),
            Self::InOutExpo => {
                if t < 0.5 {
                    2f64.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f64.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
            Self::InBack => BACK_C3 * t.powi(3) - BACK_C1 * t * t,
            Self::OutBack => 1.0 + BACK_C3 * (t - 1.0).powi(3) + BACK_C1 * (t - 1.0).powi(2),
            Self::InOutBack => {
                let c2 = BACK_C1 * 1.525;
                if t < 0.5 {
                    (2.0 * t).powi(2) * ((c2 + 1.0) * 2.0 * t - c2) / 2.0
                } else {
                    ((2.0 * t - 2.0).powi(2) * ((c2 + 1.0) * (t * 2.0 - 2.0) + c2) + 2.0) / 2.0
                }
            }
            Self::InBounce => 1.0 - out_bounce(1.0 - t),
            Self::OutBounce => out_bounce(t),
            Self::InOutBounce => {
                if t < 0.5 {
                    (1.0 - out_bounce(1.0 - 2.0 * t)) / 2.0
                } else {
                    (1.0 + out_bounce(2.0 * t - 1.0)) / 2.0
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
