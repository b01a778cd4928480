use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn codeanalysis() -> Result<Command, Box<dyn std::error::Error>> {
    Ok(Command::cargo_bin("codeanalysis")?)
}

#[test]
fn test_xml2json_from_file() -> TestResult {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("rules.xml");
    fs::write(&input, r#"<Rules Name="x"><Rule Id="CA1001"/></Rules>"#)?;

    codeanalysis()?
        .arg("xml2json")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Rules\""))
        .stdout(predicate::str::contains("\"Id\": \"CA1001\""));
    Ok(())
}

#[test]
fn test_xml2json_from_stdin() -> TestResult {
    codeanalysis()?
        .arg("xml2json")
        .write_stdin("<a>text</a>")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"a\": \"text\""));
    Ok(())
}

#[test]
fn test_xml2json_missing_file_fails() -> TestResult {
    let dir = tempfile::tempdir()?;
    codeanalysis()?
        .arg("xml2json")
        .arg(dir.path().join("missing.xml"))
        .assert()
        .failure();
    Ok(())
}

#[test]
fn test_json2xml_writes_nested_output() -> TestResult {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("rules.json");
    let output = dir.path().join("out").join("rules.xml");
    fs::write(&input, r#"{"Rules": {"$": {"Name": "x"}, "Rule": ["CA1001"]}}"#)?;

    codeanalysis()?
        .arg("json2xml")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("--headless")
        .assert()
        .success();

    let written = fs::read_to_string(&output)?;
    assert_eq!(written, "<Rules Name=\"x\">\n  <Rule>CA1001</Rule>\n</Rules>");
    Ok(())
}

#[test]
fn test_json2xml_keeps_input_key_order() -> TestResult {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("project.json");
    let output = dir.path().join("project.xml");
    fs::write(&input, r#"{"Project": {"Zeta": "1", "Alpha": "2", "Mid": "3"}}"#)?;

    codeanalysis()?
        .arg("json2xml")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("--headless")
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&output)?,
        "<Project>\n  <Zeta>1</Zeta>\n  <Alpha>2</Alpha>\n  <Mid>3</Mid>\n</Project>"
    );
    Ok(())
}

#[test]
fn test_prepend_and_insert() -> TestResult {
    let dir = tempfile::tempdir()?;
    let file = dir.path().join("Program.cs");
    fs::write(&file, "class A {}")?;

    codeanalysis()?
        .arg("prepend")
        .arg(&file)
        .arg("// header\n")
        .assert()
        .success();
    assert_eq!(fs::read_to_string(&file)?, "// header\nclass A {}");

    codeanalysis()?
        .arg("insert")
        .arg(&file)
        .args(["--prepend", "#pragma warning disable\n"])
        .args(["--append", "\n#pragma warning restore"])
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(&file)?,
        "#pragma warning disable\n// header\nclass A {}\n#pragma warning restore"
    );
    Ok(())
}

#[test]
fn test_insert_requires_text() -> TestResult {
    let dir = tempfile::tempdir()?;
    let file = dir.path().join("a.txt");
    fs::write(&file, "x")?;

    codeanalysis()?.arg("insert").arg(&file).assert().failure();
    assert_eq!(fs::read_to_string(&file)?, "x");
    Ok(())
}

#[test]
fn test_exists_exit_status() -> TestResult {
    let dir = tempfile::tempdir()?;
    let file = dir.path().join("a.txt");
    fs::write(&file, "x")?;

    codeanalysis()?.arg("exists").arg(&file).assert().success();
    codeanalysis()?.arg("exists").arg(dir.path()).assert().code(1);
    codeanalysis()?
        .args(["exists", "--dir"])
        .arg(dir.path())
        .assert()
        .success();
    codeanalysis()?
        .args(["exists", "--dir"])
        .arg(&file)
        .assert()
        .code(1);
    Ok(())
}
