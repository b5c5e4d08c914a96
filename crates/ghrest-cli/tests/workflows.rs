//! End-to-end tests for `ghrest bench run` and `ghrest profile`.
//!
//! Each test publishes to a local bare remote seeded with `main` and
//! `gh-pages`. Stub `cargo` and `nperf` scripts are put first on the PATH of
//! the spawned binary, and HOME points into the sandbox so the bot identity
//! never touches the user's git config.

#![cfg(unix)]
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command as StdCommand;
use tempfile::TempDir;

const CRITERION_REPORT: &str = "target/criterion/reports/fib/index.html";

struct Sandbox {
    temp: TempDir,
}

impl Sandbox {
    /// Create a remote whose `gh-pages` holds `pages`, and a `work` clone on `main`.
    fn new(pages: &[(&str, &str)]) -> Self {
        let sandbox = Self {
            temp: TempDir::new().unwrap(),
        };
        fs::create_dir_all(sandbox.path("home")).unwrap();
        fs::create_dir_all(sandbox.path("bin")).unwrap();

        let remote = sandbox.path("remote.git");
        let seed = sandbox.path("seed");
        sandbox.git(sandbox.root(), &["init", "--bare", &remote.to_string_lossy()]);
        sandbox.git(&remote, &["symbolic-ref", "HEAD", "refs/heads/main"]);

        sandbox.git(sandbox.root(), &["init", &seed.to_string_lossy()]);
        sandbox.git(&seed, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        sandbox.git(&seed, &["remote", "add", "origin", &remote.to_string_lossy()]);
        fs::write(seed.join("README.md"), "# widgets\n").unwrap();
        sandbox.git(&seed, &["add", "README.md"]);
        sandbox.git(&seed, &["commit", "-m", "Initial commit"]);
        sandbox.git(&seed, &["push", "origin", "main"]);

        sandbox.git(&seed, &["checkout", "-b", "gh-pages"]);
        for (path, content) in pages {
            let file = seed.join(path);
            fs::create_dir_all(file.parent().unwrap()).unwrap();
            fs::write(file, content).unwrap();
        }
        sandbox.git(&seed, &["add", "--all"]);
        sandbox.git(&seed, &["commit", "-m", "Publish pages"]);
        sandbox.git(&seed, &["push", "origin", "gh-pages"]);

        sandbox.git(
            sandbox.root(),
            &["clone", &remote.to_string_lossy(), &sandbox.path("work").to_string_lossy()],
        );
        sandbox
    }

    fn root(&self) -> &Path {
        self.temp.path()
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.temp.path().join(relative)
    }

    fn search_path(&self) -> String {
        format!(
            "{}:{}",
            self.path("bin").display(),
            std::env::var("PATH").unwrap_or_default()
        )
    }

    /// Run git with the sandbox HOME and a fixed author.
    fn git(&self, cwd: &Path, args: &[&str]) -> String {
        let output = StdCommand::new("git")
            .args(["-c", "user.name=Seed", "-c", "user.email=seed@example.com"])
            .args(args)
            .current_dir(cwd)
            .env("HOME", self.path("home"))
            .env("XDG_CONFIG_HOME", self.path("home"))
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .output()
            .expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Read a file from a branch of the remote.
    fn remote_file(&self, branch: &str, path: &str) -> String {
        self.git(&self.path("remote.git"), &["show", &format!("{branch}:{path}")])
    }

    fn remote_tree(&self, branch: &str) -> Vec<String> {
        self.git(
            &self.path("remote.git"),
            &["ls-tree", "-r", "--name-only", branch],
        )
        .lines()
        .map(String::from)
        .collect()
    }

    fn remote_branches(&self) -> Vec<String> {
        self.git(
            &self.path("remote.git"),
            &["for-each-ref", "--format=%(refname:short)", "refs/heads/"],
        )
        .lines()
        .map(String::from)
        .collect()
    }

    /// Install an executable shell script as `bin/<name>`.
    fn stub(&self, name: &str, script: &str) {
        let file = self.path("bin").join(name);
        fs::write(&file, script).unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn ghrest(&self) -> Command {
        let mut cmd = Command::cargo_bin("ghrest").expect("Failed to find ghrest binary");
        cmd.current_dir(self.root())
            .env_remove("GITHUB_REPOSITORY")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .env("HOME", self.path("home"))
            .env("XDG_CONFIG_HOME", self.path("home"))
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .env("PATH", self.search_path());
        cmd
    }
}

fn change_block(lower: &str, mean: &str, upper: &str) -> String {
    format!(
        "<tr>\n<th>Change in Value:</th>\n<td>{lower}</td>\n<td>{mean}</td>\n<td>{upper}</td>\n</tr>\n"
    )
}

#[test]
fn test_bench_run_publishes_results_branch() {
    let dev_report = change_block("-1%", "0.5%", "2%");
    let old_report = change_block("1%", "2%", "3%");
    let sandbox = Sandbox::new(&[
        ("bench/dev/criterion/reports/fib/index.html", &dev_report),
        ("bench/41/criterion/reports/fib/index.html", &old_report),
    ]);

    let baseline_seen = sandbox.path("baseline-seen");
    sandbox.stub(
        "cargo",
        &format!(
            r#"#!/bin/sh
set -e
[ "$1" = criterion ] || exit 2
if [ -f {CRITERION_REPORT} ]; then touch "{}"; fi
mkdir -p "$(dirname {CRITERION_REPORT})"
cat > {CRITERION_REPORT} <<'EOF'
{}EOF
"#,
            baseline_seen.display(),
            change_block("2.0%", "3.0%", "4.0%"),
        ),
    );

    sandbox
        .ghrest()
        .args(["--quiet", "bench", "run", "--pr", "42", "--repo-dir", "work"])
        .assert()
        .success();

    assert!(baseline_seen.exists(), "dev reports were not copied into target/criterion");

    let branch = sandbox
        .remote_branches()
        .into_iter()
        .find(|b| b.starts_with("gh-pages_42_"))
        .expect("results branch was not pushed");
    let (date, time) = branch["gh-pages_42_".len()..].split_once('_').unwrap();
    assert_eq!(date.len(), 8);
    assert_eq!(time.len(), 6);

    let tree = sandbox.remote_tree(&branch);
    assert!(tree.contains(&"bench/42/criterion/reports/fib/index.html".to_string()));
    assert!(tree.contains(&"bench/dev/criterion/reports/fib/index.html".to_string()));
    assert!(!tree.iter().any(|path| path.starts_with("bench/41/")));

    let index = sandbox.remote_file(&branch, "bench/index.md");
    assert!(index.starts_with("# Benchmarks\n## bench/dev - Sorted By Performance Change\n"));
    assert!(index.contains("## bench/42 - Sorted By Performance Change"));
    assert!(index.contains(
        "- <span style=\"color:red\"> [2.0%, <b>3.0%</b>, 4.0%] </span>  [fib](42/criterion/reports/fib/index.html)"
    ));

    // gh-pages itself is left for the follow-up pull request
    assert!(!sandbox.remote_tree("gh-pages").iter().any(|p| p.starts_with("bench/42/")));
}

#[test]
fn test_profile_publishes_flame_graphs() {
    let sandbox = Sandbox::new(&[
        ("profiling/20000101_sleeper.svg", "<svg>old</svg>"),
        ("profiling/index.md", "# Profiling\n"),
    ]);
    sandbox.stub("cargo", "#!/bin/sh\n[ \"$1\" = build ] || exit 2\n");
    sandbox.stub(
        "nperf",
        r#"#!/bin/sh
case "$1" in
record) echo "samples of $3" > "$5" ;;
flamegraph) echo "<svg>$(cat "$2")</svg>" ;;
*) exit 2 ;;
esac
"#,
    );
    fs::write(
        sandbox.path("ghrest.toml"),
        "[profiling]\nhistory = 5\n\n[profiling.apps]\nsleeper = [\"sleep\", \"30\"]\n",
    )
    .unwrap();

    sandbox
        .ghrest()
        .args(["profile", "--repo-dir", "work"])
        .assert()
        .success();

    let tree = sandbox.remote_tree("gh-pages");
    assert!(!tree.contains(&"profiling/20000101_sleeper.svg".to_string()));
    let svg = tree
        .iter()
        .find(|p| p.starts_with("profiling/") && p.ends_with("_sleeper.svg"))
        .expect("flame graph was not pushed");
    let date = &svg["profiling/".len().."profiling/".len() + 8];

    // Raw nperf data is not published
    assert!(!tree.contains(&format!("profiling/{date}_sleeper")));
    assert!(sandbox.remote_file("gh-pages", svg).starts_with("<svg>samples of "));
    assert_eq!(
        sandbox.remote_file("gh-pages", "profiling/index.md"),
        format!("# Profiling\n- [sleeper - {date}]({date}_sleeper.svg)")
    );

    let log = sandbox.git(
        &sandbox.path("remote.git"),
        &["log", "-1", "--format=%an %s", "gh-pages"],
    );
    assert_eq!(log, "profiling-bot update profiling results");
}
