use crate::foundation::core::{Rgba, Value};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlendEquation {
    #[default]
    FuncAdd,
    Subtract,
    ReverseSubtract,
}

impl BlendEquation {
    /// Case-insensitive parse; unknown names fall back to [`BlendEquation::FuncAdd`].
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "add" => Self::FuncAdd,
            "subtract" => Self::Subtract,
            "reversesubtract" => Self::ReverseSubtract,
            other => {
                tracing::debug!(name = other, "unknown blend equation, using add");
                Self::FuncAdd
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    ConstantColor,
    OneMinusConstantColor,
    ConstantAlpha,
    OneMinusConstantAlpha,
    SrcAlphaSaturate,
}

impl BlendFactor {
    /// Case-insensitive parse. `None` for unknown names; callers pick the fallback.
    pub fn parse(name: &str) -> Option<Self> {
        let f = match name.to_ascii_lowercase().as_str() {
            "zero" => Self::Zero,
            "one" => Self::One,
            "srccolor" => Self::SrcColor,
            "oneminussrccolor" => Self::OneMinusSrcColor,
            "dstcolor" => Self::DstColor,
            "oneminusdstcolor" => Self::OneMinusDstColor,
            "srcalpha" => Self::SrcAlpha,
            "oneminussrcalpha" => Self::OneMinusSrcAlpha,
            "dstalpha" => Self::DstAlpha,
            "oneminusdstalpha" => Self::OneMinusDstAlpha,
            "constantcolor" => Self::ConstantColor,
            "oneminusconstantcolor" => Self::OneMinusConstantColor,
            "constantalpha" => Self::ConstantAlpha,
            "oneminusconstantalpha" => Self::OneMinusConstantAlpha,
            "srcalphasaturate" => Self::SrcAlphaSaturate,
            _ => return None,
        };
        Some(f)
    }

    fn parse_or(name: &str, fallback: Self) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            tracing::debug!(name, ?fallback, "unknown blend factor");
            fallback
        })
    }
}

/// Fully resolved blend configuration handed to the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlendState {
    pub color: Rgba,
    pub equation_rgb: BlendEquation,
    pub equation_alpha: BlendEquation,
    pub src_rgb: BlendFactor,
    pub src_alpha: BlendFactor,
    pub dst_rgb: BlendFactor,
    pub dst_alpha: BlendFactor,
}

impl Default for BlendState {
    fn default() -> Self {
        Self {
            color: Rgba::TRANSPARENT,
            equation_rgb: BlendEquation::FuncAdd,
            equation_alpha: BlendEquation::FuncAdd,
            src_rgb: BlendFactor::SrcAlpha,
            src_alpha: BlendFactor::SrcAlpha,
            dst_rgb: BlendFactor::OneMinusSrcAlpha,
            dst_alpha: BlendFactor::OneMinusSrcAlpha,
        }
    }
}

/// Blend settings by name, as configured on a draw node.
#[derive(Clone, Debug)]
pub struct BlendParams {
    pub color: Value<Rgba>,
    pub equation_rgb: Value<String>,
    pub equation_alpha: Value<String>,
    pub src_rgb: Value<String>,
    pub src_alpha: Value<String>,
    pub dst_rgb: Value<String>,
    pub dst_alpha: Value<String>,
}

impl Default for BlendParams {
    fn default() -> Self {
        Self {
            color: Value::Literal(Rgba::TRANSPARENT),
            equation_rgb: "add".into(),
            equation_alpha: "add".into(),
            src_rgb: "srcAlpha".into(),
            src_alpha: "srcAlpha".into(),
            dst_rgb: "oneMinusSrcAlpha".into(),
            dst_alpha: "oneMinusSrcAlpha".into(),
        }
    }
}

impl BlendParams {
    /// Resolve every name; unknown sources fall back to `SrcAlpha`, destinations to
    /// `OneMinusSrcAlpha`.
    pub fn resolve(&self) -> BlendState {
        BlendState {
            color: self.color.resolve(),
            equation_rgb: BlendEquation::parse(&self.equation_rgb.resolve()),
            equation_alpha: BlendEquation::parse(&self.equation_alpha.resolve()),
            src_rgb: BlendFactor::parse_or(&self.src_rgb.resolve(), BlendFactor::SrcAlpha),
            src_alpha: BlendFactor::parse_or(&self.src_alpha.resolve(), BlendFactor::SrcAlpha),
            dst_rgb: BlendFactor::parse_or(&self.dst_rgb.resolve(), BlendFactor::OneMinusSrcAlpha),
            dst_alpha: BlendFactor::parse_or(
                &self.dst_alpha.resolve(),
                BlendFactor::OneMinusSrcAlpha,
            ),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/blend.rs"]
mod tests;
