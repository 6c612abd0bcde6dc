// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docpick — method channel host.
//
// Entry point. Initialises logging, loads the picker config, registers the
// plugin against the platform bridge and serves method calls read from
// stdin, one JSON object per line. Replies go to stdout; logs go to stderr.

mod envelope;

use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use docpick_core::PickerConfig;
use docpick_core::error::Result;
use docpick_plugin::FilePickerPlugin;

use envelope::{ReplyLine, parse_line};

/// Directory searched for `docpick.json` when `DOCPICK_CONFIG_DIR` is unset.
fn config_dir() -> PathBuf {
    std::env::var_os("DOCPICK_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = PickerConfig::load_or_default(&config_dir());
    let plugin = FilePickerPlugin::register(docpick_bridge::platform_bridge(), config);

    tracing::info!(channel = plugin.channel_name(), "docpick host ready");

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(line) = rx.recv().await {
            if stdout.write_all(line.as_bytes()).await.is_err()
                || stdout.write_all(b"\n").await.is_err()
                || stdout.flush().await.is_err()
            {
                tracing::error!("stdout closed, dropping replies");
                break;
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let call = match parse_line(&line) {
            Ok(call) => call,
            Err(reply) => {
                tracing::warn!("ignoring malformed method call");
                send(&tx, &reply);
                continue;
            }
        };

        let plugin = plugin.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let reply = plugin.handle(&call.call).await;
            send(&tx, &ReplyLine { id: call.id, reply });
        });
    }

    tracing::info!("stdin closed, waiting for outstanding calls");
    drop(tx);
    let _ = writer.await;
    Ok(())
}

fn send(tx: &mpsc::UnboundedSender<String>, reply: &ReplyLine) {
    match serde_json::to_string(reply) {
        Ok(json) => {
            let _ = tx.send(json);
        }
        Err(e) => tracing::error!(error = %e, "could not encode reply"),
    }
}
