// Document transform driver: holds the document for one run and applies
// the image pass and the optional style passes to it. Each pass is a
// streaming rewrite, so markup no pass touches is emitted byte for byte.

use crate::api::ImageUploader;
use crate::css::LengthRule;
use crate::error::DocumentError;
use crate::normalize::{normalize, ImagePolicy};
use crate::resolve::{resolve, ImageRef};
use lol_html::{element, rewrite_str, RewriteStrSettings};
use std::path::Path;
use tracing::{debug, info, warn};

/// Outcome counters for one image pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImagePassReport {
    pub uploaded: usize,
    pub failed: usize,
    pub missing: usize,
    pub remote: usize,
}

/// HTML document text, rewritten in place by the passes.
pub struct Document {
    html: String,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        Document {
            html: html.to_string(),
        }
    }

    /// Visit every `img` in document order. Local files that exist are
    /// uploaded once each; `src` is replaced only when an upload succeeds.
    /// Images without a `src`, or whose file is missing, are left alone.
    pub fn process_images(
        &mut self,
        base_dir: &Path,
        uploader: &dyn ImageUploader,
        policy: ImagePolicy,
    ) -> Result<ImagePassReport, DocumentError> {
        let mut report = ImagePassReport::default();

        self.html = rewrite_str(
            &self.html,
            RewriteStrSettings {
                element_content_handlers: vec![element!("img", |img| {
                    let src = match img.get_attribute("src") {
                        Some(s) if !s.is_empty() => s,
                        _ => return Ok(()),
                    };

                    match resolve(&src, base_dir) {
                        ImageRef::Remote => {
                            debug!("Keeping remote image {src}");
                            report.remote += 1;
                        }
                        ImageRef::Missing(path) => {
                            warn!("Image not found at {}", path.display());
                            report.missing += 1;
                            return Ok(());
                        }
                        ImageRef::Local(path) => match uploader.upload(&path) {
                            Some(url) => {
                                img.set_attribute("src", &url)?;
                                report.uploaded += 1;
                            }
                            None => report.failed += 1,
                        },
                    }

                    normalize(img, policy)
                })],
                ..RewriteStrSettings::default()
            },
        )?;

        info!(
            "Images: {} uploaded, {} failed, {} missing, {} remote",
            report.uploaded, report.failed, report.missing, report.remote
        );
        Ok(report)
    }

    /// Apply `rule` to every element with a `style` attribute. Returns the
    /// number of elements whose style changed; others are not written to.
    pub fn rewrite_styles(&mut self, rule: &LengthRule) -> Result<usize, DocumentError> {
        let mut changed = 0;

        self.html = rewrite_str(
            &self.html,
            RewriteStrSettings {
                element_content_handlers: vec![element!("[style]", |el| {
                    let Some(style) = el.get_attribute("style") else {
                        return Ok(());
                    };
                    let rewritten = rule.rewrite(&style);
                    if rewritten != style {
                        el.set_attribute("style", &rewritten)?;
                        changed += 1;
                    }
                    Ok(())
                })],
                ..RewriteStrSettings::default()
            },
        )?;

        info!("Rewrote {} on {changed} element(s)", rule.property());
        Ok(changed)
    }

    /// Halve every `margin-left` length.
    pub fn halve_margins(&mut self) -> Result<usize, DocumentError> {
        self.rewrite_styles(&LengthRule::margin_left())
    }

    /// Double every negative `text-indent` length.
    pub fn double_negative_indents(&mut self) -> Result<usize, DocumentError> {
        self.rewrite_styles(&LengthRule::text_indent())
    }

    pub fn serialize(self) -> String {
        self.html
    }
}

/// Which passes to run over a document.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformOptions {
    pub halve_margins: bool,
    pub double_negative_indents: bool,
    pub policy: ImagePolicy,
}

/// Run the full pipeline: load, image pass, optional margin and indent
/// passes, serialize.
pub fn transform(
    html: &str,
    base_dir: &Path,
    uploader: &dyn ImageUploader,
    options: TransformOptions,
) -> Result<(String, ImagePassReport), DocumentError> {
    let mut doc = Document::parse(html);
    let report = doc.process_images(base_dir, uploader, options.policy)?;
    if options.halve_margins {
        doc.halve_margins()?;
    }
    if options.double_negative_indents {
        doc.double_negative_indents()?;
    }
    Ok((doc.serialize(), report))
}
