// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn detail_messages_match_spec_strings() {
    assert_eq!(
        ValidationError::UnsupportedLanguageMode.detail(),
        "unsupported language/mode"
    );
    assert!(ValidationError::InvalidFilename("../etc/passwd".into())
        .detail()
        .contains("invalid filename"));
    assert!(ValidationError::FileTooLarge { max: 200_000 }
        .detail()
        .contains("file too large"));
    assert!(ValidationError::TooManyFiles { max: 50 }
        .detail()
        .contains("too many files"));
}
