// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android platform bridge via JNI.
//
// Requires the Android NDK and targets `aarch64-linux-android` or
// `armv7-linux-androideabi`. Each trait method invokes the corresponding
// Android API through JNI calls into the ART runtime.
//
// ## Architecture notes
//
// The host Activity owns the lifecycle. A small Java glue class
// (`dev.docpick.DocPickBridge`) forwards three events into Rust through the
// exported `native*` functions at the bottom of this file:
//
// - activity attached: the Activity is pinned as a global reference and
//   becomes the foreground context used to launch the chooser;
// - activity detached: the reference is released, so `selectFile` fails with
//   `NO_ACTIVITY` until the next attach;
// - `onActivityResult`: the request code, result code and `Intent.getData()`
//   are handed to every registered `ActivityResultListener`.

#![cfg(target_os = "android")]

use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};

use jni::objects::{GlobalRef, JClass, JObject, JString, JValue};
use jni::sys::{jboolean, jint, jsize, JNI_FALSE, JNI_TRUE};
use jni::{JNIEnv, JavaVM};

use docpick_core::error::{PickerError, Result};
use docpick_core::types::{ActivityResult, ContentUri, PickerIntent, ResultCode};

use crate::traits::*;

// ---------------------------------------------------------------------------
// Process-wide JNI state
// ---------------------------------------------------------------------------

/// `OpenableColumns.DISPLAY_NAME`.
const DISPLAY_NAME_COLUMN: &str = "_display_name";

/// `Intent.CATEGORY_OPENABLE`.
const CATEGORY_OPENABLE: &str = "android.intent.category.OPENABLE";

/// Upper bound for a single `InputStream.read` round trip.
const MAX_READ_CHUNK: usize = 64 * 1024;

static JAVA_VM: OnceLock<JavaVM> = OnceLock::new();

static FOREGROUND_ACTIVITY: Mutex<Option<GlobalRef>> = Mutex::new(None);

static LISTENERS: Mutex<Vec<Arc<dyn ActivityResultListener>>> = Mutex::new(Vec::new());

// ---------------------------------------------------------------------------
// JNI bootstrap helpers
// ---------------------------------------------------------------------------

/// The `JavaVM`, as reported by the glue class or, failing that, by
/// `ndk_context` (set by `android_main` / `ANativeActivity_onCreate`).
fn java_vm() -> Result<&'static JavaVM> {
    if let Some(vm) = JAVA_VM.get() {
        return Ok(vm);
    }
    let ctx = ndk_context::android_context();
    // SAFETY: `ctx.vm()` returns the `JavaVM*` set by the NDK glue code.
    // The pointer is guaranteed valid for the lifetime of the process.
    let vm = unsafe { JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| jni_err("JavaVM::from_raw", e))?;
    Ok(JAVA_VM.get_or_init(|| vm))
}

/// Obtain a [`JNIEnv`] for the current thread, attaching it if necessary.
fn jni_env() -> Result<JNIEnv<'static>> {
    java_vm()?
        .attach_current_thread_permanently()
        .map_err(|e| jni_err("attach_current_thread", e))
}

/// The foreground Activity registered by the glue class.
fn activity() -> Result<GlobalRef> {
    let slot = FOREGROUND_ACTIVITY
        .lock()
        .map_err(|_| PickerError::Bridge("foreground activity lock poisoned".into()))?;
    slot.clone().ok_or(PickerError::NoActivity)
}

/// Convenience: map any `jni::errors::Error` into `PickerError::Bridge`.
fn jni_err(context: &str, e: jni::errors::Error) -> PickerError {
    PickerError::Bridge(format!("{context}: {e}"))
}

/// Error type for closures run inside a JNI local frame.
///
/// `with_local_frame` needs an error that can absorb a raw JNI error; this
/// wraps [`PickerError`] so call sites can keep their `jni_err` context.
#[derive(Debug)]
struct FrameError(PickerError);

impl From<jni::errors::Error> for FrameError {
    fn from(e: jni::errors::Error) -> Self {
        FrameError(jni_err("JNI", e))
    }
}

impl From<PickerError> for FrameError {
    fn from(e: PickerError) -> Self {
        FrameError(e)
    }
}

impl From<FrameError> for PickerError {
    fn from(e: FrameError) -> Self {
        e.0
    }
}

type FrameResult<T> = std::result::Result<T, FrameError>;

/// Clear a pending Java exception so later JNI calls stay legal.
fn clear_exception(env: &mut JNIEnv<'_>) {
    if env.exception_check().unwrap_or(false) {
        let _ = env.exception_describe();
        let _ = env.exception_clear();
    }
}

/// Run `f` inside a fresh local reference frame.
///
/// Threads attached with `attach_current_thread_permanently` never return to
/// Java, so local references would otherwise pile up for the life of the
/// thread.
fn in_frame<T>(capacity: i32, f: impl FnOnce(&mut JNIEnv<'_>) -> FrameResult<T>) -> Result<T> {
    let mut env = jni_env()?;
    let outcome = env.with_local_frame(capacity, f);
    clear_exception(&mut env);
    outcome.map_err(Into::into)
}

/// `Uri.parse(uri)`
fn parse_uri<'a>(env: &mut JNIEnv<'a>, uri: &str) -> FrameResult<JObject<'a>> {
    let j_uri_str: JString = env
        .new_string(uri)
        .map_err(|e| jni_err("new_string(uri)", e))?;

    Ok(env
        .call_static_method(
            "android/net/Uri",
            "parse",
            "(Ljava/lang/String;)Landroid/net/Uri;",
            &[JValue::Object(&j_uri_str)],
        )
        .map_err(|e| jni_err("Uri.parse", e))?
        .l()
        .map_err(|e| jni_err("Uri.parse->l", e))?)
}

/// `activity.getContentResolver()`
fn content_resolver<'a>(env: &mut JNIEnv<'a>, activity: &JObject<'_>) -> FrameResult<JObject<'a>> {
    Ok(env
        .call_method(
            activity,
            "getContentResolver",
            "()Landroid/content/ContentResolver;",
            &[],
        )
        .map_err(|e| jni_err("getContentResolver", e))?
        .l()
        .map_err(|e| jni_err("getContentResolver->l", e))?)
}

/// Read `OpenableColumns.DISPLAY_NAME` from the first row of `cursor`.
fn read_display_name(env: &mut JNIEnv<'_>, cursor: &JObject<'_>) -> FrameResult<Option<String>> {
    let has_row = env
        .call_method(cursor, "moveToFirst", "()Z", &[])
        .map_err(|e| jni_err("Cursor.moveToFirst", e))?
        .z()
        .map_err(|e| jni_err("Cursor.moveToFirst->z", e))?;
    if !has_row {
        return Ok(None);
    }

    let j_column: JString = env
        .new_string(DISPLAY_NAME_COLUMN)
        .map_err(|e| jni_err("new_string(DISPLAY_NAME)", e))?;
    let index = env
        .call_method(
            cursor,
            "getColumnIndex",
            "(Ljava/lang/String;)I",
            &[JValue::Object(&j_column)],
        )
        .map_err(|e| jni_err("Cursor.getColumnIndex", e))?
        .i()
        .map_err(|e| jni_err("Cursor.getColumnIndex->i", e))?;
    if index < 0 {
        return Ok(None);
    }

    let value = env
        .call_method(
            cursor,
            "getString",
            "(I)Ljava/lang/String;",
            &[JValue::Int(index)],
        )
        .map_err(|e| jni_err("Cursor.getString", e))?
        .l()
        .map_err(|e| jni_err("Cursor.getString->l", e))?;
    if value.is_null() {
        return Ok(None);
    }

    let name: String = env
        .get_string(&JString::from(value))
        .map_err(|e| jni_err("get_string(displayName)", e))?
        .into();
    Ok(Some(name))
}

// ---------------------------------------------------------------------------
// Bridge struct
// ---------------------------------------------------------------------------

/// Android implementation of the picker platform bridge.
///
/// All methods go through JNI to call the Android SDK. The struct is
/// zero-sized; the foreground Activity and the listeners live in statics
/// because the JNI entry points have no other way to reach them.
pub struct AndroidBridge;

impl AndroidBridge {
    /// Create a new Android bridge.
    ///
    /// This does **not** touch JNI; the first JNI call happens lazily when
    /// a trait method is invoked.
    pub fn new() -> Self {
        Self
    }
}

impl Default for AndroidBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformBridge for AndroidBridge {
    fn platform_name(&self) -> &str {
        "Android"
    }
}

// ---------------------------------------------------------------------------
// NativeActivityHost — Intent + startActivityForResult
// ---------------------------------------------------------------------------

impl NativeActivityHost for AndroidBridge {
    /// `"Android " + Build.VERSION.RELEASE`.
    fn platform_version(&self) -> String {
        let release = in_frame(4, |env| {
            let value = env
                .get_static_field("android/os/Build$VERSION", "RELEASE", "Ljava/lang/String;")
                .map_err(|e| jni_err("Build.VERSION.RELEASE", e))?
                .l()
                .map_err(|e| jni_err("Build.VERSION.RELEASE->l", e))?;
            let release: String = env
                .get_string(&JString::from(value))
                .map_err(|e| jni_err("get_string(RELEASE)", e))?
                .into();
            Ok(release)
        });

        match release {
            Ok(release) => format!("Android {release}"),
            Err(e) => {
                tracing::warn!(error = %e, "Android: could not read Build.VERSION.RELEASE");
                "Android".into()
            }
        }
    }

    fn has_foreground_activity(&self) -> bool {
        FOREGROUND_ACTIVITY
            .lock()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }

    /// Launch the Storage Access Framework chooser.
    ///
    /// The chosen `content://` URI arrives asynchronously through
    /// `nativeOnActivityResult` with the same `request_code`.
    fn launch_document_picker(&self, intent: &PickerIntent, request_code: i32) -> Result<()> {
        let activity = activity()?;
        let action = intent.action.intent_action();

        tracing::info!(
            action,
            mime = %intent.mime_type,
            request_code,
            "Android: launching document chooser"
        );

        in_frame(16, |env| {
            let j_action: JString = env
                .new_string(action)
                .map_err(|e| jni_err("new_string(action)", e))?;

            let j_intent: JObject = env
                .new_object(
                    "android/content/Intent",
                    "(Ljava/lang/String;)V",
                    &[JValue::Object(&j_action)],
                )
                .map_err(|e| jni_err("new Intent", e))?;

            // intent.addCategory(Intent.CATEGORY_OPENABLE)
            if intent.openable_only {
                let j_category: JString = env
                    .new_string(CATEGORY_OPENABLE)
                    .map_err(|e| jni_err("new_string(CATEGORY_OPENABLE)", e))?;
                env.call_method(
                    &j_intent,
                    "addCategory",
                    "(Ljava/lang/String;)Landroid/content/Intent;",
                    &[JValue::Object(&j_category)],
                )
                .map_err(|e| jni_err("addCategory(OPENABLE)", e))?;
            }

            let j_mime: JString = env
                .new_string(&intent.mime_type)
                .map_err(|e| jni_err("new_string(mime)", e))?;
            env.call_method(
                &j_intent,
                "setType",
                "(Ljava/lang/String;)Landroid/content/Intent;",
                &[JValue::Object(&j_mime)],
            )
            .map_err(|e| jni_err("setType", e))?;

            env.call_method(
                activity.as_obj(),
                "startActivityForResult",
                "(Landroid/content/Intent;I)V",
                &[JValue::Object(&j_intent), JValue::Int(request_code)],
            )
            .map_err(|e| jni_err("startActivityForResult", e))?;

            Ok(())
        })?;

        tracing::info!(request_code, "Android: chooser dispatched, awaiting onActivityResult");
        Ok(())
    }

    fn add_activity_result_listener(&self, listener: Arc<dyn ActivityResultListener>) {
        if let Ok(mut listeners) = LISTENERS.lock() {
            listeners.push(listener);
        }
    }
}

// ---------------------------------------------------------------------------
// NativeContentResolver — ContentResolver + Context.getCacheDir
// ---------------------------------------------------------------------------

impl NativeContentResolver for AndroidBridge {
    /// Query `OpenableColumns.DISPLAY_NAME` for a `content://` URI.
    ///
    /// The cursor is closed on every path, including when reading the row
    /// throws.
    fn query_display_name(&self, uri: &ContentUri) -> Result<Option<String>> {
        if !uri.is_content() {
            return Ok(None);
        }
        let activity = activity()?;

        in_frame(16, |env| {
            let j_uri = parse_uri(env, uri.as_str())?;
            let resolver = content_resolver(env, activity.as_obj())?;

            let null = JObject::null();
            let cursor = env
                .call_method(
                    &resolver,
                    "query",
                    "(Landroid/net/Uri;[Ljava/lang/String;Ljava/lang/String;[Ljava/lang/String;Ljava/lang/String;)Landroid/database/Cursor;",
                    &[
                        JValue::Object(&j_uri),
                        JValue::Object(&null),
                        JValue::Object(&null),
                        JValue::Object(&null),
                        JValue::Object(&null),
                    ],
                )
                .map_err(|e| jni_err("ContentResolver.query", e))?
                .l()
                .map_err(|e| jni_err("ContentResolver.query->l", e))?;
            if cursor.is_null() {
                return Ok(None);
            }

            let name = read_display_name(env, &cursor);
            clear_exception(env);
            env.call_method(&cursor, "close", "()V", &[])
                .map_err(|e| jni_err("Cursor.close", e))?;
            name
        })
    }

    /// `ContentResolver.openInputStream(uri)`, wrapped as [`Read`].
    fn open_input_stream(&self, uri: &ContentUri) -> Result<Box<dyn Read + Send>> {
        let activity = activity()?;

        tracing::info!(uri = %uri, "Android: opening content stream");

        let stream = in_frame(8, |env| {
            let j_uri = parse_uri(env, uri.as_str())?;
            let resolver = content_resolver(env, activity.as_obj())?;

            let input_stream = env
                .call_method(
                    &resolver,
                    "openInputStream",
                    "(Landroid/net/Uri;)Ljava/io/InputStream;",
                    &[JValue::Object(&j_uri)],
                )
                .map_err(|e| jni_err("openInputStream", e))?
                .l()
                .map_err(|e| jni_err("openInputStream->l", e))?;

            if input_stream.is_null() {
                return Err(PickerError::Bridge(format!(
                    "ContentResolver returned null InputStream for URI: {uri}"
                ))
                .into());
            }

            Ok(env
                .new_global_ref(&input_stream)
                .map_err(|e| jni_err("new_global_ref(InputStream)", e))?)
        })?;

        Ok(Box::new(JavaInputStream { stream }))
    }

    /// `context.getCacheDir().getAbsolutePath()`
    fn cache_dir(&self) -> Result<PathBuf> {
        let activity = activity()?;

        in_frame(4, |env| {
            let dir = env
                .call_method(activity.as_obj(), "getCacheDir", "()Ljava/io/File;", &[])
                .map_err(|e| jni_err("getCacheDir", e))?
                .l()
                .map_err(|e| jni_err("getCacheDir->l", e))?;
            let path = env
                .call_method(&dir, "getAbsolutePath", "()Ljava/lang/String;", &[])
                .map_err(|e| jni_err("File.getAbsolutePath", e))?
                .l()
                .map_err(|e| jni_err("File.getAbsolutePath->l", e))?;
            let path: String = env
                .get_string(&JString::from(path))
                .map_err(|e| jni_err("get_string(cacheDir)", e))?
                .into();
            Ok(PathBuf::from(path))
        })
    }
}

// ---------------------------------------------------------------------------
// java.io.InputStream as std::io::Read
// ---------------------------------------------------------------------------

/// Owning wrapper around a Java `InputStream`. Closed on drop.
struct JavaInputStream {
    stream: GlobalRef,
}

fn io_err(e: PickerError) -> io::Error {
    match e {
        PickerError::Io(inner) => inner,
        other => io::Error::other(other.to_string()),
    }
}

impl Read for JavaInputStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let len = buf.len().min(MAX_READ_CHUNK) as jsize;
        let stream = &self.stream;

        in_frame(4, |env| {
            let array = env
                .new_byte_array(len)
                .map_err(|e| jni_err("new_byte_array", e))?;
            let read = env
                .call_method(
                    stream.as_obj(),
                    "read",
                    "([BII)I",
                    &[JValue::Object(&array), JValue::Int(0), JValue::Int(len)],
                )
                .map_err(|e| jni_err("InputStream.read", e))?
                .i()
                .map_err(|e| jni_err("InputStream.read->i", e))?;

            // -1 marks end of stream.
            if read <= 0 {
                return Ok(0);
            }
            let read = read as usize;
            let mut chunk = vec![0i8; read];
            env.get_byte_array_region(&array, 0, &mut chunk)
                .map_err(|e| jni_err("get_byte_array_region", e))?;
            for (dst, src) in buf.iter_mut().zip(chunk) {
                *dst = src as u8;
            }
            Ok(read)
        })
        .map_err(io_err)
    }
}

impl Drop for JavaInputStream {
    fn drop(&mut self) {
        let stream = &self.stream;
        let closed = in_frame(2, |env| {
            env.call_method(stream.as_obj(), "close", "()V", &[])
                .map_err(|e| jni_err("InputStream.close", e))?;
            Ok(())
        });
        if let Err(e) = closed {
            tracing::warn!(error = %e, "Android: failed to close content stream");
        }
    }
}

// ---------------------------------------------------------------------------
// JNI entry points called by dev.docpick.DocPickBridge
// ---------------------------------------------------------------------------

/// `static native void nativeOnAttachedToActivity(Activity activity)`
#[unsafe(no_mangle)]
pub extern "system" fn Java_dev_docpick_DocPickBridge_nativeOnAttachedToActivity<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
    activity: JObject<'local>,
) {
    if let Ok(vm) = env.get_java_vm() {
        let _ = JAVA_VM.set(vm);
    }
    match env.new_global_ref(&activity) {
        Ok(global) => {
            if let Ok(mut slot) = FOREGROUND_ACTIVITY.lock() {
                *slot = Some(global);
                tracing::info!("Android: foreground activity attached");
            }
        }
        Err(e) => tracing::error!(error = %e, "Android: could not pin foreground activity"),
    }
}

/// `static native void nativeOnDetachedFromActivity()`
#[unsafe(no_mangle)]
pub extern "system" fn Java_dev_docpick_DocPickBridge_nativeOnDetachedFromActivity<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
) {
    if let Ok(mut slot) = FOREGROUND_ACTIVITY.lock() {
        *slot = None;
        tracing::info!("Android: foreground activity detached");
    }
}

/// `static native boolean nativeOnActivityResult(int requestCode, int resultCode, String dataUri)`
///
/// `dataUri` is `intent.getData().toString()`, or `null` when the result
/// carries no data.
#[unsafe(no_mangle)]
pub extern "system" fn Java_dev_docpick_DocPickBridge_nativeOnActivityResult<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    request_code: jint,
    result_code: jint,
    data_uri: JString<'local>,
) -> jboolean {
    let data = if data_uri.is_null() {
        None
    } else {
        match env.get_string(&data_uri) {
            Ok(uri) => Some(ContentUri::new(String::from(uri))),
            Err(e) => {
                tracing::error!(error = %e, "Android: unreadable activity result data");
                None
            }
        }
    };
    let result = ActivityResult {
        result_code: ResultCode::from_raw(result_code),
        data,
    };

    let listeners: Vec<_> = match LISTENERS.lock() {
        Ok(guard) => guard.clone(),
        Err(_) => return JNI_FALSE,
    };
    let handled = listeners
        .iter()
        .any(|listener| listener.on_activity_result(request_code, result.clone()));

    if handled { JNI_TRUE } else { JNI_FALSE }
}
