// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builds the right [`xrun_adapters::DebugAdapter`] backend for a session's
//! language (§4.4, §9 "Polymorphic adapters"), running whatever compile
//! step that backend needs first.

use xrun_adapters::{DebugAdapter, DelveAdapter, DynamicAdapter, GdbAdapter, JdbAdapter, JsAdapter};
use xrun_core::{Language, SessionDescriptor};
use xrun_registry::SessionRecord;
use xrun_sandbox::{main_class_from_entry, CPP_BINARY, GO_BINARY};
use xrun_supervisor::command_from_spec;

/// Launch the debug backend for `record`'s language. Returns the compiler's
/// stderr as `Err` on a failed build step (§7 "surface the compiler/debugger
/// stderr verbatim; fatal for the session").
pub async fn launch(record: &SessionRecord) -> Result<Box<dyn DebugAdapter>, String> {
    let descriptor: &SessionDescriptor = &record.descriptor;
    let cwd = record.sandbox.workdir.path();
    let workdir_mount = &record.sandbox.workdir_mount;

    match descriptor.language {
        Language::Dynamic => DynamicAdapter::launch(&descriptor.entry, &descriptor.args, cwd, workdir_mount)
            .await
            .map(|a| Box::new(a) as Box<dyn DebugAdapter>)
            .map_err(|e| e.to_string()),
        Language::Script => JsAdapter::launch(&descriptor.entry, &descriptor.args, cwd, workdir_mount)
            .await
            .map(|a| Box::new(a) as Box<dyn DebugAdapter>)
            .map_err(|e| e.to_string()),
        Language::Jvm => {
            let main_class = main_class_from_entry(&descriptor.entry);
            JdbAdapter::launch(&descriptor.entry, &main_class, &descriptor.args, cwd)
                .await
                .map(|a| Box::new(a) as Box<dyn DebugAdapter>)
                .map_err(|e| e.to_string())
        }
        Language::SystemsCpp => {
            run_compile_step(record).await?;
            let binary = format!("./{CPP_BINARY}");
            GdbAdapter::launch(&binary, &descriptor.args, cwd)
                .await
                .map(|a| Box::new(a) as Box<dyn DebugAdapter>)
                .map_err(|e| e.to_string())
        }
        Language::CompiledGo => {
            run_compile_step(record).await?;
            let binary = format!("./{GO_BINARY}");
            DelveAdapter::launch(&binary, &descriptor.args, cwd)
                .await
                .map(|a| Box::new(a) as Box<dyn DebugAdapter>)
                .map_err(|e| e.to_string())
        }
    }
}

async fn run_compile_step(record: &SessionRecord) -> Result<(), String> {
    let Some(spec) = &record.sandbox.compile_spec else { return Ok(()) };
    let output = command_from_spec(spec).output().await.map_err(|e| format!("sandbox spawn failed: {e}"))?;
    if !output.status.success() {
        return Err(String::from_utf8_lossy(&output.stderr).into_owned());
    }
    Ok(())
}
