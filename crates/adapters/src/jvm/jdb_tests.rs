use super::*;

#[test]
fn breakpoint_hit_regex_captures_function_and_line() {
    let line = r#"Breakpoint hit: "thread=main", Main.main(), line=5"#;
    let caps = BREAKPOINT_HIT.captures(line).unwrap();
    assert_eq!(&caps["func"], "Main.main");
    assert_eq!(&caps["line"], "5");
}

#[test]
fn step_completed_regex_captures_function_and_line() {
    let line = r#"Step completed: "thread=main", Main.main(), line=6"#;
    let caps = STEP_COMPLETED.captures(line).unwrap();
    assert_eq!(&caps["func"], "Main.main");
    assert_eq!(&caps["line"], "6");
}

#[test]
fn classifies_exception_line() {
    let line = "Exception occurred: java.lang.NullPointerException";
    match classify_line(line) {
        Some(AdapterEvent::Exception { message, .. }) => {
            assert_eq!(message, "java.lang.NullPointerException");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn classifies_application_exit() {
    assert_eq!(classify_line("The application exited"), Some(AdapterEvent::Terminated { code: 0 }));
}

#[test]
fn ignores_unrelated_chatter() {
    assert_eq!(classify_line("Initializing jdb ..."), None);
}

#[test]
fn prompt_regex_matches_thread_qualified_and_plain_prompts() {
    assert!(PROMPT.is_match("main[1]"));
    assert!(PROMPT.is_match(">"));
    assert!(!PROMPT.is_match("Breakpoint hit"));
}

#[test]
fn parse_stack_frames_reads_where_output_top_frame_first() {
    let lines: Vec<String> = vec![
        "[1] Main.main (Main.java:10)".to_string(),
        "[2] Main.helper (Main.java:20)".to_string(),
    ];

    let frames = parse_stack_frames(&lines);
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].file, "Main.java");
    assert_eq!(frames[0].line, 10);
    assert_eq!(frames[0].function, "Main.main");
    assert_eq!(frames[1].function, "Main.helper");
}

#[test]
fn parse_locals_skips_section_headers() {
    let lines: Vec<String> = vec![
        "Method arguments:".to_string(),
        "Local variables:".to_string(),
        "x = 5".to_string(),
        "name = \"hello\"".to_string(),
    ];

    let locals = parse_locals(&lines);
    assert_eq!(locals.get("x"), Some(&"5".to_string()));
    assert_eq!(locals.get("name"), Some(&"\"hello\"".to_string()));
    assert_eq!(locals.len(), 2);
}
