//! End-to-end tests: tokenize, run every built-in check, render.

use manilint::checks::select_checks;
use manilint::{lint, tokenize, Config, Linter, Location, RunOptions, Severity};

fn problems(source: &str) -> Vec<(String, usize, usize)> {
    lint(source, RunOptions::check())
        .expect("should lint")
        .report
        .problems
        .iter()
        .map(|p| (p.check.to_string(), p.location.line, p.location.column))
        .collect()
}

fn fixed(source: &str) -> String {
    lint(source, RunOptions::fix()).expect("should lint").output
}

const MESSY: &str = "\
class webserver (
  $ensure = present,
) {
  file { '/etc/httpd':
    ensure => directory,
    owner => 'root',
    mode    => '0755'
  }

  $defaults = {
    'a' => 1,
    'long_key' => 2,
  }

  package {
    'httpd': ;
    'mod_ssl':
      ensure => $ensure ? {
        present => installed,
        default  => absent,
      },
      require => Package['httpd']
  }
}
";

#[test]
fn test_round_trip_is_lossless() {
    let sources = [
        MESSY,
        "",
        "\n\n",
        "# only a comment\n",
        "/* block\n comment */ notify { 'x': }\r\n",
        "$s = \"multi\nline ${var} string\"\nfile { $s: }",
    ];
    for source in sources {
        let tokens = tokenize(source).expect("should tokenize");
        assert_eq!(tokens.render(), source);
        let outcome = lint(source, RunOptions::check()).expect("should lint");
        assert_eq!(outcome.output, source);
        assert!(!outcome.modified);
    }
}

#[test]
fn test_messy_manifest_report() {
    assert_eq!(
        problems(MESSY),
        vec![
            ("trailing-comma".to_string(), 7, 22),
            ("trailing-comma".to_string(), 22, 34),
            ("arrow-alignment".to_string(), 6, 11),
            ("arrow-alignment".to_string(), 7, 13),
            ("arrow-alignment".to_string(), 11, 9),
            ("arrow-alignment".to_string(), 18, 14),
            ("arrow-alignment".to_string(), 20, 18),
        ]
    );
}

#[test]
fn test_messy_manifest_fix() {
    insta::assert_snapshot!(fixed(MESSY).trim_end(), @r"
    class webserver (
      $ensure = present,
    ) {
      file { '/etc/httpd':
        ensure => directory,
        owner  => 'root',
        mode   => '0755',
      }

      $defaults = {
        'a'        => 1,
        'long_key' => 2,
      }

      package {
        'httpd': ;
        'mod_ssl':
          ensure  => $ensure ? {
            present => installed,
            default => absent,
          },
          require => Package['httpd'],
      }
    }
    ");
}

#[test]
fn test_fixing_is_idempotent() {
    let once = fixed(MESSY);
    let outcome = lint(&once, RunOptions::fix()).expect("should lint");
    assert!(outcome.report.is_clean(), "{:?}", outcome.report.problems);
    assert_eq!(outcome.output, once);
    assert!(!outcome.modified);
}

#[test]
fn test_scope_independence() {
    let aligned = "file { '/tmp/foo':\n  ensure => file,\n  mode   => '0444',\n}";
    assert!(problems(aligned).is_empty());

    let too_far = "file { '/tmp/foo':\n  ensure  => file,\n  mode    => '0444',\n}";
    assert_eq!(
        problems(too_far),
        vec![
            ("arrow-alignment".to_string(), 2, 11),
            ("arrow-alignment".to_string(), 3, 11),
        ]
    );
    assert_eq!(fixed(too_far), aligned);
}

#[test]
fn test_nested_scope_isolation() {
    let source = "\
file { 'foo':
  ensure  => $ensure,
  require => $ensure ? {
    present => Class['tomcat::install'],
    absent  => undef,
  },
  foo     => bar,
}";
    assert!(problems(source).is_empty());
}

#[test]
fn test_commented_attribute_is_excluded() {
    let source = "file { 'foo':\n  ensure => directory,\n  # purge => true,\n}";
    assert!(problems(source).is_empty());
}

#[test]
fn test_one_liners_are_exempt() {
    let source = "class{'some_class':}\ninclude 'a_module'\nfile { 'x': ensure => file, mode => '0644' }\n";
    assert!(problems(source).is_empty());
}

#[test]
fn test_multi_title_scoping() {
    let source = "\
file {
  '/tmp/foo': ;
  '/tmp/bar':
    foo => 'bar';
  '/tmp/baz':
    gronk => 'bah',
    meh => 'no'
}";
    assert_eq!(
        problems(source),
        vec![
            ("trailing-comma".to_string(), 7, 16),
            ("arrow-alignment".to_string(), 7, 9),
        ]
    );
}

#[test]
fn test_trailing_comma_single_error() {
    let source = "file { 'foo':\n  foo => bar,\n  baz => qux\n}";
    let outcome = lint(source, RunOptions::fix()).expect("should lint");
    assert_eq!(outcome.report.problems.len(), 1);
    let problem = &outcome.report.problems[0];
    assert_eq!(problem.severity, Severity::Error);
    assert_eq!(problem.location, Location::new(3, 13));
    assert!(problem.fixed);
    assert_eq!(outcome.output, "file { 'foo':\n  foo => bar,\n  baz => qux,\n}");
}

#[test]
fn test_control_comments_suppress_problems_and_fixes() {
    let source = "\
file { 'foo':
  ensure => file,
  mode  => '0644', # lint:ignore:arrow-alignment
  owner => 'root' # lint:ignore:all
}
# lint:ignore:trailing-comma
file { 'bar':
  ensure => file
}
# lint:endignore
file { 'baz':
  ensure => file
}";
    let outcome = lint(source, RunOptions::fix()).expect("should lint");
    let found: Vec<(&str, usize)> = outcome
        .report
        .problems
        .iter()
        .map(|p| (p.check.as_str(), p.location.line))
        .collect();
    assert_eq!(found, vec![("trailing-comma", 12)]);
    assert!(outcome.output.contains("  mode  => '0644', # lint:ignore:arrow-alignment\n"));
    assert!(outcome.output.contains("  owner => 'root' # lint:ignore:all\n"));
    assert!(outcome.output.contains("file { 'bar':\n  ensure => file\n}"));
    assert!(outcome.output.ends_with("file { 'baz':\n  ensure => file,\n}"));
}

#[test]
fn test_config_disables_and_overrides() {
    let config = Config::parse(
        r#"
[checks.trailing-comma]
enabled = false

[checks.arrow-alignment]
severity = "error"
"#,
    )
    .expect("should parse");
    let linter = manilint::linter_with_config(config);
    assert_eq!(linter.active_checks(), vec!["arrow-alignment"]);

    let report = linter
        .lint("file { 'x':\n  a => 1,\n  bb => 2\n}", RunOptions::check())
        .expect("should lint")
        .report;
    assert_eq!(report.problems.len(), 1);
    assert_eq!(report.problems[0].check, "arrow-alignment");
    assert_eq!(report.problems[0].severity, Severity::Error);
}

#[test]
fn test_selected_checks_only() {
    let checks = select_checks(&["trailing-comma"], &[]).expect("should select");
    let linter = Linter::builder().checks(checks).build();
    let report = linter
        .lint("file { 'x':\n  a => 1,\n  bb => 2\n}", RunOptions::check())
        .expect("should lint")
        .report;
    assert_eq!(report.problems.len(), 1);
    assert_eq!(report.problems[0].check, "trailing-comma");
}

#[test]
fn test_lex_error_is_reported() {
    let err = lint("file { 'x':\n  ensure => 'open\n}", RunOptions::check())
        .expect_err("should fail");
    assert!(err.to_string().to_lowercase().contains("unterminated"));
}
