//! Native file picker bridge.
//!
//! One hidden `<input type="file">` per target is created on first use and
//! clicked from inside the tap handler (browsers only open pickers during a
//! user gesture). Cancelling the picker leaves the input in place for the
//! next request. Results arrive asynchronously and are queued in an
//! [`Inbox`] that the render loop drains.

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, File, FileReader, HtmlInputElement};

use crate::app::state::{PickTarget, PickedFile};
use crate::console;

pub type Inbox = Rc<RefCell<Vec<PickedFile>>>;

#[derive(Debug, Error)]
pub enum PickerError {
    #[error("no document to attach the picker to")]
    NoDocument,
    #[error("DOM call failed: {0}")]
    Dom(String),
}

fn dom_err(e: wasm_bindgen::JsValue) -> PickerError {
    PickerError::Dom(format!("{e:?}"))
}

/// DOM id of the input serving `target`.
fn input_id(target: PickTarget) -> String {
    match target {
        PickTarget::Cover(book_id) => format!("picker-cover-{book_id}"),
        PickTarget::ProofPhoto => "picker-proof".to_string(),
    }
}

/// Open the picker for `target`. The chosen file lands in `inbox`.
pub fn open(target: PickTarget, inbox: &Inbox) -> Result<(), PickerError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or(PickerError::NoDocument)?;

    let id = input_id(target);
    let input = match document.get_element_by_id(&id) {
        Some(el) => el
            .dyn_into::<HtmlInputElement>()
            .map_err(|_| PickerError::Dom(format!("#{id} is not an input")))?,
        None => create_input(&document, &id, target, inbox)?,
    };
    // Picking the same file twice in a row must still fire `change`.
    input.set_value("");
    input.click();
    Ok(())
}

fn create_input(
    document: &Document,
    id: &str,
    target: PickTarget,
    inbox: &Inbox,
) -> Result<HtmlInputElement, PickerError> {
    let body = document.body().ok_or(PickerError::NoDocument)?;
    let input: HtmlInputElement = document
        .create_element("input")
        .map_err(dom_err)?
        .dyn_into()
        .map_err(|_| PickerError::Dom("created element is not an input".into()))?;
    input.set_id(id);
    input.set_type("file");
    input.set_accept("image/*");
    input.set_attribute("style", "display:none").map_err(dom_err)?;
    if target == PickTarget::ProofPhoto {
        // Phones open the rear camera straight away.
        input.set_attribute("capture", "environment").map_err(dom_err)?;
    }
    body.append_child(&input).map_err(dom_err)?;

    let onchange = Closure::<dyn FnMut(Event)>::new({
        let input = input.clone();
        let inbox = inbox.clone();
        move |_: Event| {
            let Some(file) = input.files().and_then(|list| list.get(0)) else {
                return;
            };
            if let Err(e) = deliver(target, file, inbox.clone()) {
                console::error(&format!("ファイルを読み込めませんでした: {e}"));
            }
        }
    });
    input.set_onchange(Some(onchange.as_ref().unchecked_ref()));
    // Lives as long as the input, which lives as long as the page.
    onchange.forget();
    Ok(input)
}

/// Proof photos only need the name; covers need the bytes.
fn deliver(target: PickTarget, file: File, inbox: Inbox) -> Result<(), PickerError> {
    let name = file.name();
    if target == PickTarget::ProofPhoto {
        inbox.borrow_mut().push(PickedFile {
            target,
            name,
            bytes: Vec::new(),
        });
        return Ok(());
    }

    let reader = FileReader::new().map_err(dom_err)?;
    let onload = Closure::once_into_js({
        let reader = reader.clone();
        move |_: Event| match reader.result() {
            Ok(buf) => {
                let bytes = js_sys::Uint8Array::new(&buf).to_vec();
                inbox.borrow_mut().push(PickedFile {
                    target,
                    name,
                    bytes,
                });
            }
            Err(e) => console::error(&format!("FileReader: {e:?}")),
        }
    });
    reader.set_onload(Some(onload.unchecked_ref()));
    reader.read_as_array_buffer(&file).map_err(dom_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BOOKS;

    #[test]
    fn one_input_per_target() {
        let mut ids: Vec<String> = BOOKS.iter().map(|b| input_id(PickTarget::Cover(b.id))).collect();
        ids.push(input_id(PickTarget::ProofPhoto));
        let count = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), count);
        assert_eq!(input_id(PickTarget::Cover("atomic")), input_id(PickTarget::Cover("atomic")));
    }
}
