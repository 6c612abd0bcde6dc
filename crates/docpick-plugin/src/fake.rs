// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory platform bridge for tests.

use std::collections::HashMap;
use std::io::{self, Cursor, Read};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};

use docpick_bridge::traits::*;
use docpick_core::error::{PickerError, Result};
use docpick_core::types::{ActivityResult, ContentUri, PickerIntent};

/// Content served for one URI.
#[derive(Clone)]
pub struct FakeContent {
    pub display_name: Option<String>,
    pub bytes: Vec<u8>,
    /// Fail the stream once this many bytes have been read.
    pub fail_after: Option<usize>,
    /// Hold the stream at its first read until the gate opens.
    pub gate: Option<Arc<ReadGate>>,
}

/// Blocks a reader until the test lets it through.
#[derive(Default)]
pub struct ReadGate {
    entered: AtomicBool,
    open: Mutex<bool>,
    opened: Condvar,
}

impl ReadGate {
    /// Whether a reader is waiting at (or has passed) the gate.
    pub fn entered(&self) -> bool {
        self.entered.load(Ordering::SeqCst)
    }

    pub fn open(&self) {
        *self.open.lock().expect("gate lock") = true;
        self.opened.notify_all();
    }

    fn pass(&self) {
        self.entered.store(true, Ordering::SeqCst);
        let mut open = self.open.lock().expect("gate lock");
        while !*open {
            open = self.opened.wait(open).expect("gate wait");
        }
    }
}

struct GatedReader {
    inner: Box<dyn Read + Send>,
    gate: Option<Arc<ReadGate>>,
}

impl Read for GatedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(gate) = self.gate.take() {
            gate.pass();
        }
        self.inner.read(buf)
    }
}

pub struct FakeBridge {
    pub foreground: AtomicBool,
    pub launches: AtomicUsize,
    pub last_intent: Mutex<Option<(PickerIntent, i32)>>,
    cache: PathBuf,
    content: Mutex<HashMap<String, FakeContent>>,
    listeners: Mutex<Vec<Arc<dyn ActivityResultListener>>>,
}

impl FakeBridge {
    pub fn new(cache: PathBuf) -> Self {
        Self {
            foreground: AtomicBool::new(true),
            launches: AtomicUsize::new(0),
            last_intent: Mutex::new(None),
            cache,
            content: Mutex::new(HashMap::new()),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn serve(&self, uri: &str, content: FakeContent) {
        self.content
            .lock()
            .expect("content lock")
            .insert(uri.to_string(), content);
    }

    /// Play the OS: hand a result to the listeners.
    pub fn deliver(&self, request_code: i32, result: ActivityResult) -> bool {
        let listeners = self.listeners.lock().expect("listeners lock").clone();
        listeners
            .iter()
            .any(|l| l.on_activity_result(request_code, result.clone()))
    }

    pub fn launch_count(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }
}

struct FailingReader {
    inner: Cursor<Vec<u8>>,
    fail_after: usize,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let position = self.inner.position() as usize;
        if position >= self.fail_after {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "provider died"));
        }
        let allowed = (self.fail_after - position).min(buf.len());
        self.inner.read(&mut buf[..allowed])
    }
}

impl PlatformBridge for FakeBridge {
    fn platform_name(&self) -> &str {
        "Fake"
    }
}

impl NativeActivityHost for FakeBridge {
    fn platform_version(&self) -> String {
        "FakeOS 1.0".into()
    }

    fn has_foreground_activity(&self) -> bool {
        self.foreground.load(Ordering::SeqCst)
    }

    fn launch_document_picker(&self, intent: &PickerIntent, request_code: i32) -> Result<()> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        *self.last_intent.lock().expect("intent lock") = Some((intent.clone(), request_code));
        Ok(())
    }

    fn add_activity_result_listener(&self, listener: Arc<dyn ActivityResultListener>) {
        self.listeners.lock().expect("listeners lock").push(listener);
    }
}

impl NativeContentResolver for FakeBridge {
    fn query_display_name(&self, uri: &ContentUri) -> Result<Option<String>> {
        if !uri.is_content() {
            return Ok(None);
        }
        Ok(self
            .content
            .lock()
            .expect("content lock")
            .get(uri.as_str())
            .and_then(|c| c.display_name.clone()))
    }

    fn open_input_stream(&self, uri: &ContentUri) -> Result<Box<dyn Read + Send>> {
        let content = self
            .content
            .lock()
            .expect("content lock")
            .get(uri.as_str())
            .cloned()
            .ok_or_else(|| PickerError::Bridge(format!("no content for {uri}")))?;
        let inner = Cursor::new(content.bytes);
        let reader: Box<dyn Read + Send> = match content.fail_after {
            Some(fail_after) => Box::new(FailingReader { inner, fail_after }),
            None => Box::new(inner),
        };
        Ok(match content.gate {
            Some(gate) => Box::new(GatedReader {
                inner: reader,
                gate: Some(gate),
            }),
            None => reader,
        })
    }

    fn cache_dir(&self) -> Result<PathBuf> {
        Ok(self.cache.clone())
    }
}
