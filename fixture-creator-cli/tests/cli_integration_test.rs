#[allow(deprecated)]
use assert_cmd::{Command, cargo::cargo_bin};
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tempfile::TempDir;

const XPTO_SCHEMA: &str = r#"{
  "name": "Xpto",
  "package": "br.com.kimae.in",
  "fields": [
    { "name": "s1", "type": "String" },
    { "name": "i1", "type": "Integer" },
    { "name": "l1", "type": "Long" }
  ]
}"#;

const MULTI_SCHEMA: &str = r#"{
  "types": [
    {
      "name": "Customer",
      "package": "br.com.kimae.in",
      "imports": ["java.time.LocalDate"],
      "fields": [
        { "name": "name", "type": "String" },
        { "name": "since", "type": "LocalDate" },
        { "name": "address", "type": "Address" }
      ]
    },
    {
      "name": "Address",
      "package": "br.com.kimae.in",
      "fields": [
        { "name": "street", "type": "String" },
        { "name": "number", "type": "Integer" }
      ]
    }
  ]
}"#;

/// Helper to write a file into the temp dir
fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn fixture_creator() -> Command {
    Command::from_std(process::Command::new(cargo_bin!("fixture-creator")))
}

#[test]
fn test_generate_single_type() {
    let temp_dir = TempDir::new().unwrap();
    let schema = write_file(temp_dir.path(), "xpto.json", XPTO_SCHEMA);

    let mut cmd = fixture_creator();
    cmd.arg("generate").arg(&schema);

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("public class XptoFixture {\n"))
        .stdout(predicate::str::contains(
            "\tpublic XptoFixture s1(final java.lang.String s1) {",
        ))
        .stdout(predicate::str::contains(
            "\t\treturn this\n\t\t\t.s1(randomAlphanumeric(20))\n\t\t\t.i1(nextInt())\n\t\t\t.l1(nextLong())\n\t\t;\n",
        ))
        .stdout(predicate::str::ends_with("\t}\n}\n"));
}

#[test]
fn test_generate_output_line_count() {
    let temp_dir = TempDir::new().unwrap();
    let schema = write_file(temp_dir.path(), "xpto.json", XPTO_SCHEMA);

    let output = fixture_creator()
        .arg("generate")
        .arg(&schema)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 9 + 5 * 3);
}

#[test]
fn test_generate_named_target() {
    let temp_dir = TempDir::new().unwrap();
    let schema = write_file(temp_dir.path(), "multi.json", MULTI_SCHEMA);

    let mut cmd = fixture_creator();
    cmd.arg("generate").arg(&schema).arg("--target").arg("Customer");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("public class CustomerFixture {"))
        .stdout(predicate::str::contains(
            "public CustomerFixture since(final java.time.LocalDate since) {",
        ))
        .stdout(predicate::str::contains(".since(LocalDate.now())"))
        .stdout(predicate::str::contains(
            ".address(AddressFixture.get().random().build())",
        ))
        .stdout(predicate::str::contains("AddressFixture {").not());
}

#[test]
fn test_generate_requires_target_for_multiple_types() {
    let temp_dir = TempDir::new().unwrap();
    let schema = write_file(temp_dir.path(), "multi.json", MULTI_SCHEMA);

    let mut cmd = fixture_creator();
    cmd.arg("generate").arg(&schema);

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("--target"))
        .stderr(predicate::str::contains("Customer, Address"));
}

#[test]
fn test_generate_unknown_target() {
    let temp_dir = TempDir::new().unwrap();
    let schema = write_file(temp_dir.path(), "multi.json", MULTI_SCHEMA);

    let mut cmd = fixture_creator();
    cmd.arg("generate").arg(&schema).arg("-t").arg("Order");

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Introspection of 'Order' failed"));
}

#[test]
fn test_generate_missing_schema_file() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = fixture_creator();
    cmd.arg("generate").arg(temp_dir.path().join("missing.json"));

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Failed to load schema"));
}

#[test]
fn test_generate_without_field_metadata_fails() {
    let temp_dir = TempDir::new().unwrap();
    let schema = write_file(temp_dir.path(), "opaque.json", r#"{ "name": "Opaque" }"#);

    let mut cmd = fixture_creator();
    cmd.arg("generate").arg(&schema);

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("no accessible field metadata"));
}

#[test]
fn test_generate_unresolvable_type_produces_no_output() {
    let temp_dir = TempDir::new().unwrap();
    let schema = write_file(
        temp_dir.path(),
        "broken.json",
        r#"{ "name": "Broken", "fields": [
            { "name": "ok", "type": "String" },
            { "name": "bad", "type": "com.acme." }
        ] }"#,
    );

    let mut cmd = fixture_creator();
    cmd.arg("generate").arg(&schema);

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Cannot determine a class name"));
}

#[test]
fn test_generate_all_to_stdout() {
    let temp_dir = TempDir::new().unwrap();
    let schema = write_file(temp_dir.path(), "multi.json", MULTI_SCHEMA);

    let output = fixture_creator()
        .arg("generate")
        .arg(&schema)
        .arg("--all")
        .arg("--threads")
        .arg("2")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let customer = stdout.find("public class CustomerFixture {").unwrap();
    let address = stdout.find("public class AddressFixture {").unwrap();
    assert!(customer < address, "fixtures should follow document order");
    assert!(stdout.contains("}\n\npublic class AddressFixture {"));
}

#[test]
fn test_generate_all_to_directory() {
    let temp_dir = TempDir::new().unwrap();
    let schema = write_file(temp_dir.path(), "multi.json", MULTI_SCHEMA);
    let out_dir = temp_dir.path().join("generated");

    let mut cmd = fixture_creator();
    cmd.arg("generate")
        .arg(&schema)
        .arg("--all")
        .arg("--output")
        .arg(&out_dir);

    cmd.assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("✓ Wrote"));

    let customer = fs::read_to_string(out_dir.join("CustomerFixture.java")).unwrap();
    let address = fs::read_to_string(out_dir.join("AddressFixture.java")).unwrap();
    assert!(customer.starts_with("public class CustomerFixture {"));
    assert_eq!(address.lines().count(), 9 + 5 * 2);
}

#[test]
fn test_generate_all_to_directory_is_all_or_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let schema = write_file(
        temp_dir.path(),
        "partial.json",
        r#"{ "types": [
            { "name": "Good", "fields": [{ "name": "s1", "type": "String" }] },
            { "name": "Bad", "fields": [{ "name": "x", "type": "com.acme." }] }
        ] }"#,
    );
    let out_dir = temp_dir.path().join("generated");

    let mut cmd = fixture_creator();
    cmd.arg("generate")
        .arg(&schema)
        .arg("--all")
        .arg("--output")
        .arg(&out_dir);

    cmd.assert().failure();
    assert!(!out_dir.join("GoodFixture.java").exists());
}

#[test]
fn test_output_directory_holds_only_fixtures() {
    let temp_dir = TempDir::new().unwrap();
    let schema = write_file(temp_dir.path(), "multi.json", MULTI_SCHEMA);
    let out_dir = temp_dir.path().join("generated");

    let mut cmd = fixture_creator();
    cmd.arg("generate")
        .arg(&schema)
        .arg("--all")
        .arg("-o")
        .arg(&out_dir);
    cmd.assert().success();

    let mut names: Vec<_> = fs::read_dir(&out_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, vec!["AddressFixture.java", "CustomerFixture.java"]);
}

#[test]
fn test_duplicate_type_names_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let schema = write_file(
        temp_dir.path(),
        "dupes.json",
        r#"{ "types": [
            { "name": "A", "fields": [] },
            { "name": "A", "fields": [{ "name": "x", "type": "String" }] }
        ] }"#,
    );
    let out_dir = temp_dir.path().join("generated");

    let mut cmd = fixture_creator();
    cmd.arg("generate")
        .arg(&schema)
        .arg("--all")
        .arg("--output")
        .arg(&out_dir);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("declared more than once"));
    assert!(!out_dir.join("AFixture.java").exists());
}

#[test]
fn test_huge_indent_width_is_a_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let schema = write_file(temp_dir.path(), "xpto.json", XPTO_SCHEMA);

    let mut cmd = fixture_creator();
    cmd.arg("generate")
        .arg(&schema)
        .arg("--indent-spaces")
        .arg("9223372036854775807");

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Invalid emitter settings"))
        .stderr(predicate::str::contains("must be at most 16"));
}

#[test]
fn test_array_fields_generate() {
    let temp_dir = TempDir::new().unwrap();
    let schema = write_file(
        temp_dir.path(),
        "blob.json",
        r#"{ "name": "Blob", "package": "com.acme", "fields": [
            { "name": "data", "type": "byte[]" },
            { "name": "tags", "type": "String[]" }
        ] }"#,
    );

    let mut cmd = fixture_creator();
    cmd.arg("generate").arg(&schema);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("public BlobFixture data(final byte[] data) {"))
        .stdout(predicate::str::contains(
            "public BlobFixture tags(final java.lang.String[] tags) {",
        ));
}

#[test]
fn test_generate_all_and_target_conflict() {
    let temp_dir = TempDir::new().unwrap();
    let schema = write_file(temp_dir.path(), "multi.json", MULTI_SCHEMA);

    let mut cmd = fixture_creator();
    cmd.arg("generate")
        .arg(&schema)
        .arg("--all")
        .arg("--target")
        .arg("Customer");

    cmd.assert().failure();
}

#[test]
fn test_generate_with_flags() {
    let temp_dir = TempDir::new().unwrap();
    let schema = write_file(temp_dir.path(), "xpto.json", XPTO_SCHEMA);

    let mut cmd = fixture_creator();
    cmd.arg("generate")
        .arg(&schema)
        .arg("--indent-spaces")
        .arg("4")
        .arg("--suffix")
        .arg("Mother");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("public class XptoMother {"))
        .stdout(predicate::str::contains("        builder.s1(s1);"))
        .stdout(predicate::str::contains("\t").not());
}

#[test]
fn test_generate_with_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let schema = write_file(
        temp_dir.path(),
        "order.json",
        r#"{ "name": "Order", "imports": ["java.util.UUID"], "fields": [
            { "name": "id", "type": "UUID" },
            { "name": "customer", "type": "Customer" }
        ] }"#,
    );
    let config = write_file(
        temp_dir.path(),
        "settings.json",
        r#"{ "fixture_suffix": "Mother", "strategies": { "java.util.UUID": "UUID.randomUUID()" } }"#,
    );

    let mut cmd = fixture_creator();
    cmd.arg("--config").arg(&config).arg("generate").arg(&schema);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("public class OrderMother {"))
        .stdout(predicate::str::contains(".id(UUID.randomUUID())"))
        .stdout(predicate::str::contains(
            ".customer(CustomerMother.get().random().build())",
        ));
}

#[test]
fn test_invalid_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let schema = write_file(temp_dir.path(), "xpto.json", XPTO_SCHEMA);
    let config = write_file(temp_dir.path(), "settings.json", r#"{ "indent_spaces": 0 }"#);

    let mut cmd = fixture_creator();
    cmd.arg("--config").arg(&config).arg("generate").arg(&schema);

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Invalid emitter settings"));
}

#[test]
fn test_types_command() {
    let temp_dir = TempDir::new().unwrap();
    let schema = write_file(temp_dir.path(), "multi.json", MULTI_SCHEMA);

    let mut cmd = fixture_creator();
    cmd.env("NO_COLOR", "1").arg("types").arg(&schema);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Found 2 type(s)"))
        .stdout(predicate::str::contains("Customer"))
        .stdout(predicate::str::contains("(3 fields)"))
        .stdout(predicate::str::contains("(2 fields)"));
}

#[test]
fn test_strategies_command() {
    let mut cmd = fixture_creator();
    cmd.env("NO_COLOR", "1").arg("strategies");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("java.lang.String: randomAlphanumeric(20)"))
        .stdout(predicate::str::contains("java.lang.Boolean: nextBoolean()"))
        .stdout(predicate::str::contains(
            "Any other type: {{CLASS_NAME}}Fixture.get().random().build()",
        ));
}

#[test]
fn test_generation_is_repeatable() {
    let temp_dir = TempDir::new().unwrap();
    let schema = write_file(temp_dir.path(), "multi.json", MULTI_SCHEMA);

    let run = || {
        fixture_creator()
            .arg("generate")
            .arg(&schema)
            .arg("--all")
            .output()
            .unwrap()
            .stdout
    };

    assert_eq!(run(), run());
}
