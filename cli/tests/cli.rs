use anyhow::Result;
use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;

const MANIFEST: &str = r#"
@prefix dc: <http://purl.org/dc/terms/> .
@prefix rdfatest: <http://rdfa.info/vocabs/rdfa-test#> .
@prefix test: <http://rdfa.info/test-suite/test-cases/> .

<http://rdfa.info/test-suite/> <http://rdfa.info/vocabs/rdfa-test#version/rdfa1.1> [
  <http://rdfa.info/vocabs/rdfa-test#hostLanguage/html5> ( test:0001 )
] ;
  rdfatest:processor <http://example.com/proc> .

test:0001 dc:title "Test 0001" ;
  <http://example.com/proc> <http://example.com/proc/assertion/0001> .
"#;

const ASSERTIONS: &str = r#"
@prefix earl: <http://www.w3.org/ns/earl#> .
@prefix doap: <http://usefulinc.com/ns/doap#> .

<http://example.com/proc> doap:name "Proc" .
<http://example.com/proc/assertion/0001> a earl:Assertion ;
  earl:result [ earl:outcome earl:pass ] .
"#;

fn cli_command() -> Result<Command> {
    Ok(Command::cargo_bin("oxearl")?)
}

fn sources() -> Result<TempDir> {
    let dir = TempDir::new()?;
    dir.child("manifest.ttl").write_str(MANIFEST)?;
    dir.child("proc.ttl").write_str(ASSERTIONS)?;
    Ok(dir)
}

#[test]
fn cli_help() -> Result<()> {
    cli_command()?
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::starts_with("OxEARL"));
    Ok(())
}

#[test]
fn cli_report_to_stdout() -> Result<()> {
    let dir = sources()?;
    cli_command()?
        .arg("report")
        .arg(dir.child("manifest.ttl").path())
        .arg(dir.child("proc.ttl").path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""title": "Test 0001""#)
                .and(predicate::str::contains(r#""outcome": "pass""#))
                .and(predicate::str::contains(r#""name": "Proc""#))
                .and(predicate::str::contains("description").not()),
        );
    Ok(())
}

#[test]
fn cli_report_to_file() -> Result<()> {
    let dir = sources()?;
    let output = dir.child("report.json");
    cli_command()?
        .arg("report")
        .arg(dir.child("manifest.ttl").path())
        .arg(dir.child("proc.ttl").path())
        .arg("--suite-name")
        .arg("My Suite")
        .arg("--output")
        .arg(output.path())
        .assert()
        .success();
    output.assert(predicate::str::contains(r#""name": "My Suite""#));
    Ok(())
}

#[test]
fn cli_report_with_unknown_extension() -> Result<()> {
    let dir = sources()?;
    dir.child("notes.txt2").write_str("nothing")?;
    cli_command()?
        .arg("report")
        .arg(dir.child("manifest.ttl").path())
        .arg(dir.child("notes.txt2").path())
        .assert()
        .success()
        .stderr(predicate::str::contains("txt2"));
    Ok(())
}

#[test]
fn cli_report_with_invalid_source() -> Result<()> {
    let dir = TempDir::new()?;
    dir.child("broken.ttl").write_str("this is not turtle")?;
    cli_command()?
        .arg("report")
        .arg(dir.child("broken.ttl").path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not able to load the sources"));
    Ok(())
}

#[test]
fn cli_dump_to_stdout() -> Result<()> {
    let dir = sources()?;
    cli_command()?
        .arg("dump")
        .arg(dir.child("proc.ttl").path())
        .arg("--format")
        .arg("nt")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "<http://example.com/proc> <http://usefulinc.com/ns/doap#name> \"Proc\" .",
        ));
    Ok(())
}

#[test]
fn cli_dump_format_from_output_file() -> Result<()> {
    let dir = sources()?;
    let output = dir.child("dump.ttl");
    cli_command()?
        .arg("dump")
        .arg(dir.child("proc.ttl").path())
        .arg("--output")
        .arg(output.path())
        .assert()
        .success();
    output.assert(predicate::str::contains("@prefix earl:"));
    Ok(())
}

#[test]
fn cli_dump_without_format() -> Result<()> {
    let dir = sources()?;
    cli_command()?
        .arg("dump")
        .arg(dir.child("proc.ttl").path())
        .assert()
        .failure();
    Ok(())
}

#[test]
fn cli_dump_keeps_absolute_prefixes() -> Result<()> {
    let dir = sources()?;
    cli_command()?
        .arg("dump")
        .arg(dir.child("proc.ttl").path())
        .arg("--format")
        .arg("ttl")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("@prefix doap: <http://usefulinc.com/ns/doap#> .")
                .and(predicate::str::contains("@base").not()),
        );
    Ok(())
}

#[test]
fn cli_dump_with_base() -> Result<()> {
    let dir = sources()?;
    cli_command()?
        .arg("dump")
        .arg(dir.child("proc.ttl").path())
        .arg("--format")
        .arg("ttl")
        .arg("--dump-base")
        .arg("http://example.com/")
        .assert()
        .success()
        .stdout(predicate::str::contains("@base <http://example.com/> ."));
    Ok(())
}
