use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{PageError, PageResult};
use crate::graph::frame::FrameCtx;
use crate::graph::node::{BuildCtx, Handle, Node, NodeBase, NodeKind};
use crate::render::drawable::SizedDrawable;

/// Where image bytes come from.
#[derive(Clone, Debug)]
pub enum ImageSource {
    Bytes(Arc<[u8]>),
    Path(PathBuf),
}

impl ImageSource {
    fn describe(&self) -> String {
        match self {
            Self::Bytes(b) => format!("<{} bytes>", b.len()),
            Self::Path(p) => p.display().to_string(),
        }
    }
}

/// Decoded RGBA8 pixels with premultiplied alpha.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Read and decode an image.
///
/// Resolves once; failures surface as [`PageError::Resource`] and are never retried.
#[tracing::instrument(skip(source), fields(source = %source.describe()))]
pub async fn load_image(source: ImageSource) -> PageResult<DecodedImage> {
    let decoded = match &source {
        ImageSource::Bytes(bytes) => decode_image(bytes),
        ImageSource::Path(path) => std::fs::read(path)
            .with_context(|| format!("read image '{}'", path.display()))
            .and_then(|bytes| decode_image(&bytes)),
    };
    decoded.map_err(|e| {
        let msg = format!("{e:#}");
        tracing::warn!(error = %msg, "image load failed");
        PageError::resource(msg)
    })
}

fn decode_image(bytes: &[u8]) -> anyhow::Result<DecodedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(DecodedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[derive(Clone, Debug, Default)]
pub struct ImageParams {
    pub image: Option<DecodedImage>,
}

/// Render target backed by a decoded image. Reports 0x0 until an image is set.
pub struct ImageNode {
    base: NodeBase,
    image: Option<DecodedImage>,
    dirty: bool,
}

impl NodeKind for ImageNode {
    type Params = ImageParams;
    const TYPE_NAME: &'static str = "image";

    fn build(base: NodeBase, params: Self::Params, _ctx: &BuildCtx) -> PageResult<Self> {
        let dirty = params.image.is_some();
        Ok(Self {
            base,
            image: params.image,
            dirty,
        })
    }
}

impl ImageNode {
    pub fn image(&self) -> Option<&DecodedImage> {
        self.image.as_ref()
    }

    /// Replace the pixels; the last call before the next update wins.
    pub fn set_image(&mut self, image: DecodedImage) {
        self.image = Some(image);
        self.dirty = true;
    }

    /// Load `source` into `node`, emitting `loadstart`, then `load` or `error`, then `loadend`.
    ///
    /// The node is not borrowed while the load is pending.
    pub async fn load(node: &Handle<ImageNode>, source: ImageSource) -> PageResult<()> {
        let payload = serde_json::json!({ "node": node.id().0 });
        node.borrow().base().events().trigger("loadstart", &payload);
        let res = load_image(source).await;
        if let Ok(image) = &res {
            node.borrow_mut().set_image(image.clone());
        }
        let this = node.borrow();
        let outcome = if res.is_ok() { "load" } else { "error" };
        this.base.events().trigger(outcome, &payload);
        this.base.events().trigger("loadend", &payload);
        res.map(|_| ())
    }
}

impl Node for ImageNode {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn update(&mut self, ctx: &mut FrameCtx<'_>) -> PageResult<()> {
        if !self.base.should_update() || !self.dirty {
            return Ok(());
        }
        if let Some(image) = &self.image {
            self.base.run_setup();
            ctx.surface.upload_pixels(self.base.id(), image);
            self.base.run_cleanup();
        }
        self.dirty = false;
        Ok(())
    }
}

impl SizedDrawable for ImageNode {
    fn width(&self) -> f64 {
        self.image.as_ref().map_or(0.0, |i| f64::from(i.width))
    }

    fn height(&self) -> f64 {
        self.image.as_ref().map_or(0.0, |i| f64::from(i.height))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/image.rs"]
mod tests;
