use session::{Transport, TransportError};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CloseEvent, MessageEvent, WebSocket};

/// Browser WebSocket carrying the JSON event envelope.
#[derive(Debug, Clone)]
pub struct WebSocketTransport {
    socket: WebSocket,
}

impl WebSocketTransport {
    /// Opens the connection and wires its callbacks. The callbacks live as
    /// long as the page; a closed socket is not reopened.
    pub fn open<M>(url: &str, mut on_text: M) -> Result<Self, JsValue>
    where
        M: FnMut(String) + 'static,
    {
        let socket = WebSocket::new(url)?;

        {
            let url = url.to_string();
            let onopen = Closure::wrap(Box::new(move || {
                web_sys::console::log_1(&JsValue::from_str(&format!("connected to {url}")));
            }) as Box<dyn FnMut()>);
            socket.set_onopen(Some(onopen.as_ref().unchecked_ref()));
            onopen.forget();
        }

        {
            let onmessage = Closure::wrap(Box::new(move |e: MessageEvent| {
                match e.data().dyn_into::<js_sys::JsString>() {
                    Ok(text) => on_text(text.into()),
                    Err(_) => web_sys::console::warn_1(&JsValue::from_str(
                        "ignoring non-text frame",
                    )),
                }
            }) as Box<dyn FnMut(MessageEvent)>);
            socket.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
            onmessage.forget();
        }

        {
            let onclose = Closure::wrap(Box::new(move |e: CloseEvent| {
                web_sys::console::warn_1(&JsValue::from_str(&format!(
                    "disconnected (code {}, reason {:?})",
                    e.code(),
                    e.reason()
                )));
            }) as Box<dyn FnMut(CloseEvent)>);
            socket.set_onclose(Some(onclose.as_ref().unchecked_ref()));
            onclose.forget();
        }

        {
            let onerror = Closure::wrap(Box::new(move |_e: web_sys::Event| {
                web_sys::console::error_1(&JsValue::from_str("websocket error"));
            }) as Box<dyn FnMut(web_sys::Event)>);
            socket.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            onerror.forget();
        }

        Ok(Self { socket })
    }
}

impl Transport for WebSocketTransport {
    fn send_text(&self, text: &str) -> Result<(), TransportError> {
        if self.socket.ready_state() != WebSocket::OPEN {
            return Err(TransportError::Closed);
        }
        self.socket
            .send_with_str(text)
            .map_err(|e| TransportError::Send(format!("{e:?}")))
    }
}
