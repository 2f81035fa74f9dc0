/* This file is part of the Video Reference Browser project - https://github.com/vidref/vidref-browser
*
*  Copyright (C) 2025 the Video Reference Browser contributors
*
*  This program is free software: you can redistribute it and/or modify
*  it under the terms of the GNU Affero General Public License as published by
*  the Free Software Foundation, either version 3 of the License, or
*  (at your option) any later version.
*
*  This program is distributed in the hope that it will be useful,
*  but WITHOUT ANY WARRANTY; without even the implied warranty of
*  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
*  GNU Affero General Public License for more details.
*
*  You should have received a copy of the GNU Affero General Public License
*  along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/
use cloneable_errors::{ErrContext, ErrorContext, ResContext};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::{Function, Reflect};
use web_sys::{window, Document, Element, HtmlScriptElement};

use crate::constants::{INSTAGRAM_EMBED_SCRIPT, INSTAGRAM_EMBED_VERSION};
use crate::utils::js_error;

const SCRIPT_SELECTOR: &str = "script[src*=\"instagram.com/embed.js\"]";

/// Replaces the children of `container` with an Instagram embed marker
pub fn mount_embed(container: &Element, permalink: &str) -> Result<(), ErrorContext> {
    let document = container.owner_document().context("container should belong to a document")?;
    let blockquote = document.create_element("blockquote").map_err(|e| js_error(&e).context("Failed to create the embed marker"))?;
    blockquote.set_class_name("instagram-media");
    blockquote.set_attribute("data-instgrm-permalink", permalink).map_err(|e| js_error(&e).context("Failed to set the embed permalink"))?;
    blockquote.set_attribute("data-instgrm-version", INSTAGRAM_EMBED_VERSION).map_err(|e| js_error(&e).context("Failed to set the embed version"))?;

    container.set_inner_html("");
    container.append_child(&blockquote).map_err(|e| js_error(&e).context("Failed to insert the embed marker"))?;

    ensure_embed_script(&document)
}

/// Loads `embed.js` once per page, later calls ask the loaded script to rescan the page
fn ensure_embed_script(document: &Document) -> Result<(), ErrorContext> {
    let existing = document.query_selector(SCRIPT_SELECTOR).map_err(|e| js_error(&e).context("Failed to look for the embed script"))?;
    if existing.is_some() {
        return process_embeds();
    }

    let script: HtmlScriptElement = document
        .create_element("script").map_err(|e| js_error(&e).context("Failed to create the embed script element"))?
        .dyn_into().map_err(|_| ErrorContext::new("script element was not an HtmlScriptElement"))?;
    script.set_src(INSTAGRAM_EMBED_SCRIPT);
    script.set_async(true);
    document
        .body().context("document should have a body")?
        .append_child(&script).map_err(|e| js_error(&e).context("Failed to insert the embed script"))?;
    Ok(())
}

/// Calls `window.instgrm.Embeds.process()`
///
/// The script may still be loading, in which case it processes the page by itself.
fn process_embeds() -> Result<(), ErrorContext> {
    let window: JsValue = window().context("window should exist")?.into();
    let embeds = Reflect::get(&window, &"instgrm".into())
        .and_then(|instgrm| if instgrm.is_undefined() { Ok(instgrm) } else { Reflect::get(&instgrm, &"Embeds".into()) })
        .map_err(|e| js_error(&e).context("Failed to access window.instgrm"))?;
    if embeds.is_undefined() {
        return Ok(());
    }
    let process: Function = Reflect::get(&embeds, &"process".into())
        .map_err(|e| js_error(&e).context("Failed to access instgrm.Embeds.process"))?
        .dyn_into().map_err(|_| ErrorContext::new("instgrm.Embeds.process is not a function"))?;
    process.call0(&embeds).map_err(|e| js_error(&e).context("instgrm.Embeds.process() failed"))?;
    Ok(())
}
