mod common;

use assert_cmd::prelude::{CommandCargoExt, OutputAssertExt};
use common::{TestRepo, repo};
use fake::Fake;
use fake::faker::lorem::en::Sentence;
use predicates::prelude::predicate;
use predicates::str::contains;
use revsift::artifacts::objects::object_id::ObjectId;
use rstest::rstest;

/// Linear history on `main`: add, grow, delete
fn linear(repo: &mut TestRepo) -> [ObjectId; 3] {
    let first = repo.commit(&[], &[("notes.txt", "one\n")], "Add notes");
    let second = repo.commit(
        &[&first],
        &[("notes.txt", "one\ntwo\nthree\n"), ("src/lib.rs", "fn main() {}\n")],
        "Grow notes and add source\n\nfixes #42",
    );
    let third = repo.commit(&[&second], &[("src/lib.rs", "fn main() {}\n")], "Remove notes");
    repo.branch("main", &third);

    [first, second, third]
}

#[rstest]
fn log_without_commits_fails(repo: TestRepo) -> Result<(), Box<dyn std::error::Error>> {
    repo.command()
        .arg("log")
        .assert()
        .failure()
        .stderr(contains("your current branch does not have any commits yet"));

    Ok(())
}

#[test]
fn log_outside_a_repository_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    let mut cmd = std::process::Command::cargo_bin("revsift")?;

    cmd.current_dir(dir.path())
        .env_remove("REVSIFT_REPO")
        .arg("log")
        .assert()
        .failure()
        .stderr(contains("not a git repository"));

    Ok(())
}

#[rstest]
fn log_shows_history_in_medium_format(mut repo: TestRepo) -> Result<(), Box<dyn std::error::Error>> {
    let [first, _, third] = linear(&mut repo);

    repo.command()
        .arg("log")
        .assert()
        .success()
        .stdout(contains(format!("commit {third}\nAuthor: Test Author <author@example.com>\n")))
        .stdout(contains("Date:   Sun Jan 1 10:00:00 2023 +0000\n\n    Add notes\n"))
        .stdout(contains("    Grow notes and add source\n    \n    fixes #42\n"))
        .stdout(predicate::str::ends_with("    Add notes\n\n"))
        .stdout(contains(format!("commit {first}")));

    Ok(())
}

#[rstest]
fn log_oneline_honours_max_count(mut repo: TestRepo) -> Result<(), Box<dyn std::error::Error>> {
    let [_, second, third] = linear(&mut repo);

    repo.command()
        .args(["log", "--oneline", "-n", "2"])
        .assert()
        .success()
        .stdout(format!(
            "{} Remove notes\n{} Grow notes and add source\n",
            third.to_short_oid(),
            second.to_short_oid()
        ));

    Ok(())
}

#[rstest]
fn log_from_explicit_revision(mut repo: TestRepo) -> Result<(), Box<dyn std::error::Error>> {
    let [first, second, _] = linear(&mut repo);

    repo.command()
        .args(["log", "--oneline", "main^"])
        .assert()
        .success()
        .stdout(format!(
            "{} Grow notes and add source\n{} Add notes\n",
            second.to_short_oid(),
            first.to_short_oid()
        ));

    Ok(())
}

#[rstest]
#[case::message(&["--grep", r"fixes #\d+"], &["Grow notes"], &["Add notes", "Remove notes"])]
#[case::deletions(&["--diff-filter", "D"], &["Remove notes"], &["Add notes", "Grow notes"])]
#[case::additions(&["--diff-filter", "A"], &["Add notes", "Grow notes"], &["Remove notes"])]
#[case::path(&["--", "src"], &["Grow notes"], &["Add notes", "Remove notes"])]
#[case::min_lines(&["--min-lines", "3"], &["Grow notes", "Remove notes"], &["Add notes"])]
#[case::line_range(&["--min-lines", "1", "--max-lines", "1"], &["Add notes"], &["Grow notes", "Remove notes"])]
fn log_filters_commits(
    mut repo: TestRepo,
    #[case] args: &[&str],
    #[case] shown: &[&str],
    #[case] hidden: &[&str],
) -> Result<(), Box<dyn std::error::Error>> {
    linear(&mut repo);

    let assert = repo
        .command()
        .args(["log", "--oneline"])
        .args(args)
        .assert()
        .success();
    let output = String::from_utf8(assert.get_output().stdout.clone())?;

    for subject in shown {
        assert!(output.contains(subject), "{subject:?} missing from {output:?}");
    }
    for subject in hidden {
        assert!(!output.contains(subject), "{subject:?} unexpected in {output:?}");
    }

    Ok(())
}

#[rstest]
fn log_stat_lists_changed_paths(mut repo: TestRepo) -> Result<(), Box<dyn std::error::Error>> {
    linear(&mut repo);

    repo.command()
        .args(["log", "--oneline", "--stat", "-n", "1"])
        .assert()
        .success()
        .stdout(contains("Remove notes\n\nD\tnotes.txt\n 1 file(s) changed, 3 line(s) changed\n"));

    Ok(())
}

#[rstest]
fn log_all_walks_each_branch(mut repo: TestRepo) -> Result<(), Box<dyn std::error::Error>> {
    let base = repo.commit(&[], &[("a.txt", "a\n")], "Base");
    let topic = repo.commit(&[&base], &[("a.txt", "topic\n")], "Topic work");
    let main = repo.commit(&[&base], &[("a.txt", "main\n")], "Main work");
    repo.branch("main", &main);
    repo.branch("topic", &topic);

    repo.command()
        .args(["log", "--all", "--oneline", "-n", "1"])
        .assert()
        .success()
        .stdout(format!(
            "==> main <==\n{} Main work\n==> topic <==\n{} Topic work\n",
            main.to_short_oid(),
            topic.to_short_oid()
        ));

    Ok(())
}

#[rstest]
fn log_of_clean_merge_hides_it_from_path_filter(mut repo: TestRepo) -> Result<(), Box<dyn std::error::Error>> {
    let base = repo.commit(&[], &[("a.txt", "a\n"), ("b.txt", "b\n")], "Base");
    let left = repo.commit(&[&base], &[("a.txt", "left\n"), ("b.txt", "b\n")], "Left");
    let right = repo.commit(&[&base], &[("a.txt", "a\n"), ("b.txt", "right\n")], "Right");
    let merge = repo.commit(&[&left, &right], &[("a.txt", "left\n"), ("b.txt", "right\n")], "Merge");
    repo.branch("main", &merge);

    repo.command()
        .args(["log", "--oneline", "--", "a.txt"])
        .assert()
        .success()
        .stdout(format!("{} Left\n{} Base\n", left.to_short_oid(), base.to_short_oid()));

    repo.command()
        .arg("log")
        .assert()
        .success()
        .stdout(contains(format!(
            "Merge: {} {}\n",
            left.to_short_oid(),
            right.to_short_oid()
        )));

    Ok(())
}

#[rstest]
fn repo_option_selects_the_repository(mut repo: TestRepo) -> Result<(), Box<dyn std::error::Error>> {
    let message = Sentence(3..6).fake::<String>();
    let oid = repo.commit(&[], &[("a.txt", "a\n")], &message);
    repo.branch("main", &oid);
    let elsewhere = assert_fs::TempDir::new()?;

    repo.command()
        .current_dir(elsewhere.path())
        .args(["log", "--oneline", "--repo"])
        .arg(repo.path())
        .assert()
        .success()
        .stdout(format!("{} {message}\n", oid.to_short_oid()));

    Ok(())
}

#[rstest]
#[case::invalid_pattern(&["--grep", "fix("], "Invalid message pattern 'fix('")]
#[case::inverted_range(&["--min-lines", "5", "--max-lines", "1"], "minimum 5 exceeds maximum 1")]
#[case::unknown_kind(&["--diff-filter", "AX"], "Unknown change kind in 'AX'")]
#[case::unknown_revision(&["missing"], "ambiguous argument 'missing': unknown revision")]
fn log_rejects_invalid_options(
    mut repo: TestRepo,
    #[case] args: &[&str],
    #[case] message: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    linear(&mut repo);

    repo.command()
        .arg("log")
        .args(args)
        .assert()
        .failure()
        .stderr(contains(message));

    Ok(())
}

#[rstest]
fn verbose_flag_logs_walk_summary_to_stderr(mut repo: TestRepo) -> Result<(), Box<dyn std::error::Error>> {
    linear(&mut repo);

    repo.command()
        .args(["log", "--oneline", "-v"])
        .assert()
        .success()
        .stderr(contains("walk finished"))
        .stdout(contains("Add notes"));

    Ok(())
}
