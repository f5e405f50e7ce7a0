// Library root
// -----------
// This crate exposes the document transformer used by the `d2htools`
// binary. `main.rs` parses arguments and hands off to `app::run`.
//
// Module responsibilities:
// - `api`: uploads an image file to the hosting API and returns its URL.
// - `config`: loads and initializes the API credential file.
// - `resolve`: classifies `img` sources as remote, local or missing.
// - `normalize`: replaces `width`/`height` with an inline style policy.
// - `css`: rewrites `margin-left` and `text-indent` lengths in styles.
// - `document`: the HTML tree and the passes that run over it.
// - `encoding`: input decoding with fallbacks and output encoding.
// - `output`: output file naming, accent repair and writing.
// - `ui`: save-encoding prompt and upload spinner.
// - `app`: one complete run over a document file.
pub mod api;
pub mod app;
pub mod config;
pub mod css;
pub mod document;
pub mod encoding;
pub mod error;
pub mod normalize;
pub mod output;
pub mod resolve;
pub mod ui;
