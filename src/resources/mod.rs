//! Loading assets from outside the binary.
//!
//! Native builds read files below the configured asset root with tokio; the browser
//! build fetches them relative to the page origin. Image decoding happens on the
//! loading task, the GPU upload happens back on the event loop.

use anyhow::Context;

use crate::data_structures::registry::TextureId;

pub mod texture;

/// The outcome of loading one registered texture.
#[derive(Debug)]
pub struct TextureLoad {
    pub id: TextureId,
    pub asset: String,
    pub result: anyhow::Result<image::DynamicImage>,
}

#[cfg(target_arch = "wasm32")]
pub fn asset_url(asset_root: &str, file_name: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().context("no browser window")?;
    let origin = window
        .location()
        .origin()
        .map_err(|e| anyhow::anyhow!("page has no origin: {e:?}"))?;
    let base = reqwest::Url::parse(&format!("{}/{}/", origin, asset_root.trim_matches('/')))?;
    Ok(base.join(file_name)?)
}

pub async fn load_binary(asset_root: &str, file_name: &str) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = asset_url(asset_root, file_name)?;
        reqwest::get(url)
            .await?
            .error_for_status()?
            .bytes()
            .await?
            .to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = std::path::Path::new(asset_root).join(file_name);
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("cannot read {}", path.display()))?
    };

    Ok(data)
}

pub fn decode(bytes: &[u8], file_name: &str) -> anyhow::Result<image::DynamicImage> {
    image::load_from_memory(bytes).with_context(|| format!("cannot decode {file_name}"))
}

/// Fetches and decodes one texture. Never fails; the error travels in the result.
pub async fn load_texture(asset_root: String, id: TextureId, asset: String) -> TextureLoad {
    let result = match load_binary(&asset_root, &asset).await {
        Ok(bytes) => decode(&bytes, &asset),
        Err(e) => Err(e),
    };
    TextureLoad { id, asset, result }
}
