//! Socket.IO connection to the sync backend
//!
//! Speaks Engine.IO v4 directly over a browser WebSocket. Events emitted
//! before the namespace handshake completes wait in a FIFO outbox. A
//! connection that stops receiving pings is closed and reconnected.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use syncify_dashboard::Channel;
use syncify_protocol::{ClientEvent, EnginePacket, ServerEvent, SocketPacket};
use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, CloseEvent, ErrorEvent, MessageEvent, WebSocket};

use crate::dom::set_status;

/// Callback for every decoded server event
pub type EventHandler = Rc<dyn Fn(ServerEvent)>;

/// Close code used when the server's pings stop arriving
pub const PING_TIMEOUT_CODE: u16 = 4000;

/// Delay before reconnect attempt `attempt` (0-based)
pub const fn reconnect_delay_ms(attempt: u32) -> u32 {
    100 * (1 << (if attempt < 4 { attempt } else { 4 }))
}

/// Normal and going-away closes are intentional; anything else reconnects
pub const fn should_reconnect(code: u16) -> bool {
    !matches!(code, 1000 | 1001)
}

pub struct SocketLink {
    url: String,
    ws: RefCell<Option<WebSocket>>,
    outbox: RefCell<VecDeque<String>>,
    connected: Cell<bool>,
    attempts: Cell<u32>,
    /// Closes the current socket; replaced on every connect
    watchdog: RefCell<Option<Closure<dyn FnMut()>>>,
    watchdog_timer: Cell<Option<i32>>,
    ping_deadline_ms: Cell<u64>,
}

impl SocketLink {
    pub fn new(url: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            url: url.into(),
            ws: RefCell::new(None),
            outbox: RefCell::new(VecDeque::new()),
            connected: Cell::new(false),
            attempts: Cell::new(0),
            watchdog: RefCell::new(None),
            watchdog_timer: Cell::new(None),
            ping_deadline_ms: Cell::new(0),
        })
    }

    /// Restart the ping deadline; called on open and on every ping
    fn arm_watchdog(&self) {
        self.disarm_watchdog();
        let deadline = self.ping_deadline_ms.get();
        if deadline == 0 {
            return;
        }
        let Some(win) = window() else { return };
        let watchdog = self.watchdog.borrow();
        let Some(cb) = watchdog.as_ref() else { return };
        match win.set_timeout_with_callback_and_timeout_and_arguments_0(
            cb.as_ref().unchecked_ref(),
            i32::try_from(deadline).unwrap_or(i32::MAX),
        ) {
            Ok(handle) => self.watchdog_timer.set(Some(handle)),
            Err(e) => warn!("failed to arm ping watchdog: {e:?}"),
        }
    }

    fn disarm_watchdog(&self) {
        if let (Some(handle), Some(win)) = (self.watchdog_timer.take(), window()) {
            win.clear_timeout_with_handle(handle);
        }
    }

    /// Send queued events once the namespace is connected
    pub fn flush(&self) {
        if !self.connected.get() {
            return;
        }
        let ws_opt = self.ws.borrow();
        let ws = match ws_opt.as_ref() {
            Some(ws) if ws.ready_state() == WebSocket::OPEN => ws,
            _ => return,
        };

        let mut outbox = self.outbox.borrow_mut();
        while let Some(frame) = outbox.pop_front() {
            if ws.send_with_str(&frame).is_err() {
                warn!("send failed, {} frames kept for retry", outbox.len() + 1);
                outbox.push_front(frame);
                break;
            }
        }
    }

    /// Send a control frame immediately, bypassing the outbox
    fn send_control(&self, frame: &str) {
        if let Some(ws) = self.ws.borrow().as_ref() {
            if ws.send_with_str(frame).is_err() {
                warn!("failed to send control frame {frame}");
            }
        }
    }
}

impl Channel for SocketLink {
    fn emit(&self, event: ClientEvent) {
        let args = match event.args() {
            Ok(args) => args,
            Err(e) => {
                warn!("dropping {}: {e}", event.name());
                return;
            }
        };
        debug!("emit {}", event.name());
        let frame = SocketPacket::event(event.name(), args).to_frame();
        self.outbox.borrow_mut().push_back(frame);
        self.flush();
    }
}

/// Open (or reopen) the WebSocket and wire its handlers
pub fn connect(link: &Rc<SocketLink>, on_event: &EventHandler) -> Result<(), JsValue> {
    let ws = WebSocket::new(&link.url)?;
    link.connected.set(false);
    set_status("connecting");

    // PING WATCHDOG
    link.disarm_watchdog();
    let ws_idle = ws.clone();
    let watchdog = Closure::wrap(Box::new(move || {
        warn!("no ping from backend, dropping connection");
        let _ = ws_idle.close_with_code_and_reason(PING_TIMEOUT_CODE, "ping timeout");
    }) as Box<dyn FnMut()>);
    *link.watchdog.borrow_mut() = Some(watchdog);

    // ON OPEN
    let onopen = Closure::wrap(Box::new(move || {
        debug!("websocket open, waiting for handshake");
    }) as Box<dyn FnMut()>);
    ws.set_onopen(Some(onopen.as_ref().unchecked_ref()));
    onopen.forget();

    // ON MESSAGE
    let link_msg = Rc::clone(link);
    let handler = Rc::clone(on_event);
    let onmessage = Closure::wrap(Box::new(move |e: MessageEvent| {
        match e.data().as_string() {
            Some(frame) => handle_frame(&link_msg, &frame, &handler),
            None => warn!("ignoring binary frame"),
        }
    }) as Box<dyn FnMut(_)>);
    ws.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
    onmessage.forget();

    // ON ERROR
    let onerror = Closure::wrap(Box::new(move |_e: ErrorEvent| {
        warn!("websocket error");
    }) as Box<dyn FnMut(_)>);
    ws.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    onerror.forget();

    // ON CLOSE
    let link_close = Rc::clone(link);
    let handler = Rc::clone(on_event);
    let onclose = Closure::wrap(Box::new(move |e: CloseEvent| {
        link_close.connected.set(false);
        link_close.disarm_watchdog();
        set_status("disconnected");
        if !should_reconnect(e.code()) {
            info!("websocket closed ({})", e.code());
            return;
        }
        warn!("websocket closed: {} {}", e.code(), e.reason());
        schedule_reconnect(&link_close, &handler);
    }) as Box<dyn FnMut(_)>);
    ws.set_onclose(Some(onclose.as_ref().unchecked_ref()));
    onclose.forget();

    *link.ws.borrow_mut() = Some(ws);
    Ok(())
}

fn schedule_reconnect(link: &Rc<SocketLink>, on_event: &EventHandler) {
    let attempt = link.attempts.get();
    link.attempts.set(attempt.saturating_add(1));
    let delay = reconnect_delay_ms(attempt);
    info!("reconnecting in {delay}ms (attempt {})", attempt + 1);

    let link = Rc::clone(link);
    let handler = Rc::clone(on_event);
    let callback = Closure::once(Box::new(move || {
        if let Err(e) = connect(&link, &handler) {
            warn!("reconnect failed: {e:?}");
            schedule_reconnect(&link, &handler);
        }
    }) as Box<dyn FnOnce()>);

    if let Some(win) = window() {
        #[allow(clippy::cast_possible_wrap)]
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            delay as i32,
        );
    }
    callback.forget();
}

fn handle_frame(link: &SocketLink, frame: &str, on_event: &EventHandler) {
    match EnginePacket::decode(frame) {
        Ok(EnginePacket::Open(handshake)) => {
            debug!(
                "engine.io open sid={} ping={}ms",
                handshake.sid, handshake.ping_interval
            );
            link.ping_deadline_ms.set(handshake.ping_deadline_ms());
            link.arm_watchdog();
            link.send_control(&SocketPacket::connect().to_frame());
        }
        Ok(EnginePacket::Ping(data)) => {
            link.arm_watchdog();
            link.send_control(&EnginePacket::Pong(data).encode());
        }
        Ok(EnginePacket::Message(payload)) => handle_packet(link, &payload, on_event),
        Ok(EnginePacket::Close) => {
            info!("server closed the session");
            if let Some(ws) = link.ws.borrow().as_ref() {
                let _ = ws.close();
            }
        }
        Ok(EnginePacket::Pong(_) | EnginePacket::Upgrade | EnginePacket::Noop) => {}
        Err(e) => warn!("bad frame: {e}"),
    }
}

fn handle_packet(link: &SocketLink, payload: &str, on_event: &EventHandler) {
    match SocketPacket::decode(payload) {
        Ok(SocketPacket::Connect { .. }) => {
            info!("connected to backend");
            link.connected.set(true);
            link.attempts.set(0);
            set_status("connected");
            link.flush();
        }
        Ok(SocketPacket::Event { name, args, .. }) => match ServerEvent::from_event(&name, args) {
            Ok(event) => on_event(event),
            Err(e) => warn!("dropping '{name}': {e}"),
        },
        Ok(SocketPacket::ConnectError { data, .. }) => {
            warn!("backend refused connection: {data:?}");
        }
        Ok(SocketPacket::Disconnect { .. }) => {
            info!("backend disconnected us");
            link.connected.set(false);
            if let Some(ws) = link.ws.borrow().as_ref() {
                let _ = ws.close_with_code(1000);
            }
        }
        Ok(SocketPacket::Ack { ack, .. }) => debug!("unexpected ack {ack}"),
        Err(e) => warn!("bad packet: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconnect_backoff() {
        assert_eq!(reconnect_delay_ms(0), 100);
        assert_eq!(reconnect_delay_ms(1), 200);
        assert_eq!(reconnect_delay_ms(3), 800);
        assert_eq!(reconnect_delay_ms(4), 1600);
        assert_eq!(reconnect_delay_ms(40), 1600);
    }

    #[test]
    fn test_reconnect_on_abnormal_close() {
        assert!(!should_reconnect(1000));
        assert!(!should_reconnect(1001));
        assert!(should_reconnect(1006));
        assert!(should_reconnect(1011));
        assert!(should_reconnect(PING_TIMEOUT_CODE));
    }
}
