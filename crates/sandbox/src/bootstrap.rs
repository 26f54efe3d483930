// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The dynamic-language run-mode bootstrap wrapper (§4.1): disables output
//! buffering, emits the prompt sentinel before every blocking read, and
//! runs the user's entry module with the program-visible argv the client
//! asked for.

/// The 10-byte prompt sentinel the Stream Multiplexer looks for (§4.1,
/// §4.2). Mirrored in `xrun-stream::SENTINEL`; kept as a separate constant
/// here so this crate doesn't need to depend on `xrun-stream` just to
/// generate source text.
pub const SENTINEL: &str = "<<<OC_AWAIT>>>";

pub const BOOTSTRAP_FILENAME: &str = "__xrun_bootstrap.py";

/// Render the bootstrap module's source text.
pub fn render_dynamic_bootstrap(entry: &str, args: &[String]) -> String {
    let argv = python_list_literal(std::iter::once(entry).chain(args.iter().map(String::as_str)));
    format!(
        r#"import builtins
import runpy
import sys

sys.stdout.reconfigure(write_through=True)
sys.stderr.reconfigure(write_through=True)

_xrun_real_input = builtins.input


def _xrun_input(prompt=""):
    if prompt:
        sys.stdout.write(str(prompt))
    sys.stdout.write({sentinel:?})
    sys.stdout.flush()
    return _xrun_real_input()


builtins.input = _xrun_input
sys.argv = {argv}
runpy.run_path({entry:?}, run_name="__main__")
"#,
        sentinel = SENTINEL,
        argv = argv,
        entry = entry,
    )
}

fn python_list_literal<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let quoted: Vec<String> = items.map(|s| format!("{s:?}")).collect();
    format!("[{}]", quoted.join(", "))
}

#[cfg(test)]
#[path = "bootstrap_tests.rs"]
mod tests;
