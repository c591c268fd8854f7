//! End-to-end sessions driven by scripted CI state.

use ci_wait::exit_codes;
use ci_wait::io::config::WaitConfig;
use ci_wait::test_support::{
    RecordingConsole, RecordingSleeper, ScriptedCi, context, job, run, summary,
};
use ci_wait::wait::{WaitOptions, run_wait};

fn session(ci: &ScriptedCi, opts: &WaitOptions) -> (i32, RecordingConsole, RecordingSleeper) {
    let mut console = RecordingConsole::default();
    let sleeper = RecordingSleeper::default();
    let outcome = run_wait(
        &context(),
        opts,
        ci,
        &mut console,
        &sleeper,
        &WaitConfig::default(),
    )
    .expect("session");
    (outcome.exit_code(), console, sleeper)
}

#[test]
fn single_passing_job_exits_ok() {
    let ci = ScriptedCi::new()
        .with_list(Some(vec![summary(100, "CI")]))
        .with_views(
            100,
            vec![
                Some(run("CI", "in_progress", "", vec![job(1, "build", "in_progress", "")])),
                Some(run(
                    "CI",
                    "completed",
                    "success",
                    vec![job(1, "build", "completed", "success")],
                )),
            ],
        );

    let (code, console, sleeper) = session(&ci, &WaitOptions::default());

    assert_eq!(code, exit_codes::OK);
    assert_eq!(sleeper.count(), 1);
    assert!(console.contains("Found 1 workflow run(s):"));
    assert!(console.contains("[OK] CI PASSED"));
    assert!(!console.contains("--log-failed"));
}

#[test]
fn single_failing_job_exits_failed() {
    let failed = run(
        "CI",
        "completed",
        "failure",
        vec![job(5, "build", "completed", "failure")],
    );
    let ci = ScriptedCi::new()
        .with_list(Some(vec![summary(100, "CI")]))
        .with_views(100, vec![Some(failed)]);

    let (code, console, _) = session(&ci, &WaitOptions::default());

    assert_eq!(code, exit_codes::FAILED);
    assert!(console.contains("[FAIL] CI FAILED"));
    assert!(console.contains("gh run view --log --job 5"));
}

#[test]
fn fail_fast_stops_on_first_failing_tick() {
    let mixed = run(
        "CI",
        "in_progress",
        "",
        vec![
            job(1, "build", "completed", "success"),
            job(2, "test", "completed", "failure"),
        ],
    );
    let ci = ScriptedCi::new()
        .with_list(Some(vec![summary(100, "CI")]))
        .with_views(100, vec![Some(mixed)]);

    let (code, console, sleeper) = session(&ci, &WaitOptions::default());

    assert_eq!(code, exit_codes::FAILED);
    assert_eq!(sleeper.count(), 0);
    assert_eq!(console.blocks().len(), 1);
    assert!(console.contains("Failure detected, exiting early"));
    assert!(console.contains("test  →  gh run view --log --job 2"));
    assert!(console.contains("  gh run view 100 --log-failed"));
}

#[test]
fn keep_going_rerun_that_recovers_exits_ok() {
    let ci = ScriptedCi::new()
        .with_list(Some(vec![summary(100, "CI")]))
        .with_views(
            100,
            vec![
                Some(run(
                    "CI",
                    "in_progress",
                    "",
                    vec![
                        job(1, "build", "completed", "success"),
                        job(2, "test", "completed", "failure"),
                    ],
                )),
                Some(run(
                    "CI",
                    "completed",
                    "success",
                    vec![
                        job(1, "build", "completed", "success"),
                        job(2, "test", "completed", "success"),
                    ],
                )),
            ],
        );
    let opts = WaitOptions {
        run_id: None,
        keep_going: true,
    };

    let (code, console, sleeper) = session(&ci, &opts);

    assert_eq!(code, exit_codes::OK);
    assert_eq!(sleeper.count(), 1);
    assert!(console.contains("  [FAIL] CI / test (failure)"));
    assert!(console.contains("[OK] CI PASSED"));
}

#[test]
fn keep_going_waits_for_every_run() {
    let ci = ScriptedCi::new()
        .with_list(Some(vec![summary(1, "CI"), summary(2, "Lint")]))
        .with_views(
            1,
            vec![Some(run(
                "CI",
                "completed",
                "failure",
                vec![job(10, "test", "completed", "failure")],
            ))],
        )
        .with_views(
            2,
            vec![
                Some(run("Lint", "queued", "", vec![job(20, "fmt", "queued", "")])),
                Some(run(
                    "Lint",
                    "completed",
                    "success",
                    vec![job(20, "fmt", "completed", "success")],
                )),
            ],
        );

    let opts = WaitOptions {
        run_id: None,
        keep_going: true,
    };
    let (code, console, sleeper) = session(&ci, &opts);

    assert_eq!(code, exit_codes::FAILED);
    assert_eq!(sleeper.count(), 1);
    assert!(console.contains("Progress: 2/2 (100%)"));
    assert!(console.contains("Lint PASSED"));
    assert!(console.contains("CI FAILED"));
    assert!(!console.contains("exiting early"));
}

#[test]
fn explicit_run_id_skips_discovery() {
    let ci = ScriptedCi::new().with_views(
        777,
        vec![Some(run(
            "Deploy",
            "completed",
            "success",
            vec![job(1, "ship", "completed", "success")],
        ))],
    );
    let opts = WaitOptions {
        run_id: Some("777".to_string()),
        keep_going: false,
    };

    let (code, console, _) = session(&ci, &opts);

    assert_eq!(code, exit_codes::OK);
    assert_eq!(ci.list_calls(), 0);
    assert!(console.contains("Watching specified run: 777"));
}
