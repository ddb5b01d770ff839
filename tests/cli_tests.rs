#![allow(deprecated)]
//! Integration tests for the typeweave CLI

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use typeweave::engine::well_known::{names, props};
use typeweave::store::paths::{atomic_write, type_file_in};
use typeweave::store::{ModuleArchive, OutputRoot, MANIFEST_PATH};
use typeweave::types::{
    encode_type, CompiledType, FieldDef, Marker, MarkerValue, MethodDef, Signature, TypeSig,
};

fn typeweave_cmd() -> Command {
    Command::cargo_bin("typeweave").expect("binary not found")
}

fn write_type(root: &Path, ty: &CompiledType) {
    atomic_write(&type_file_in(root, &ty.name), &encode_type(ty).unwrap()).unwrap();
}

/// `out/def/lib`: a library package whose mixin `M` targets `T`.
fn write_library_fixture(out: &Path) {
    write_type(
        out,
        &CompiledType::package_info("def.lib").with_marker(
            Marker::new(names::ROOT).with_value(props::MIXINS, MarkerValue::type_refs(["def.lib.M"])),
        ),
    );
    write_type(
        out,
        &CompiledType::class("def.lib.M")
            .with_marker(
                Marker::new(names::MIXIN).with_value(props::TARGET, MarkerValue::type_ref("def.lib.T")),
            )
            .with_method(MethodDef::new("shared", Signature::unit()))
            .with_method(MethodDef::new("fromMixin", Signature::unit())),
    );
    write_type(
        out,
        &CompiledType::class("def.lib.T").with_method(MethodDef::new("shared", Signature::unit())),
    );
}

const POM: &str = "<project>\n  <groupId>org.typeweave.libraries.2.0</groupId>\n  <artifactId>dom</artifactId>\n  <version>3.1</version>\n  <dependencies/>\n</project>\n";

#[test]
fn test_merge_json_report() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("out");
    write_library_fixture(&out);

    let output = typeweave_cmd()
        .arg("--json")
        .arg("merge")
        .arg("--out")
        .arg(&out)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["mapping"]["def.lib.T"][0], "def.lib.M");
    assert_eq!(report["targets"][0]["outcome"]["added"], 1);
    assert_eq!(report["targets"][0]["outcome"]["ignored_duplicates"], 1);
    assert!(report["targets"][0]["error"].is_null());

    let merged = OutputRoot::new(&out).read_type("def.lib.T").unwrap();
    assert!(merged.has_method("fromMixin"));
}

#[test]
fn test_merge_human_summary() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("out");
    write_library_fixture(&out);

    typeweave_cmd()
        .arg("merge")
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("[OK] def.lib.T <- def.lib.M"))
        .stdout(predicate::str::contains("Summary: 1 targets, 1 added, 1 ignored, 0 errors"));
}

#[test]
fn test_merge_strict_fails_on_broken_target() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("out");
    write_library_fixture(&out);
    fs::write(type_file_in(&out, "def.lib.T"), b"\xff\xff").unwrap();

    // Without --strict the run still completes.
    typeweave_cmd()
        .env_remove("TYPEWEAVE_STRICT")
        .arg("merge")
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("[FAIL] def.lib.T"));

    typeweave_cmd()
        .arg("merge")
        .arg("--strict")
        .arg("--out")
        .arg(&out)
        .assert()
        .failure();

    typeweave_cmd()
        .env("TYPEWEAVE_STRICT", "1")
        .arg("merge")
        .arg("--out")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("targets or union types failed"));
}

#[test]
fn test_merge_logs_to_stderr() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("out");
    write_library_fixture(&out);

    typeweave_cmd()
        .env_remove("RUST_LOG")
        .args(["--json", "--log-format", "json", "merge", "--out"])
        .arg(&out)
        .arg("--classpath")
        .arg(temp_dir.path().join("missing.twar"))
        .assert()
        .success()
        .stderr(predicate::str::contains("\"message\":\"starting merge\""))
        .stderr(predicate::str::contains("could not be opened"));
}

#[test]
fn test_merge_missing_output_root() {
    let temp_dir = TempDir::new().unwrap();
    typeweave_cmd()
        .arg("merge")
        .arg("--out")
        .arg(temp_dir.path().join("nope"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a directory"));
}

#[test]
fn test_pack_then_describe() {
    let temp_dir = TempDir::new().unwrap();
    let module = temp_dir.path().join("dom");
    write_type(&module, &CompiledType::class("def.dom.Node"));
    fs::create_dir_all(module.join("META-INF/maven")).unwrap();
    fs::write(module.join("META-INF/maven/pom.xml"), POM).unwrap();
    let archive = temp_dir.path().join("dom.twar");

    typeweave_cmd()
        .arg("pack")
        .arg(&module)
        .arg(&archive)
        .arg("--manifest-time")
        .arg("1700000000000")
        .assert()
        .success()
        .stdout(predicate::str::contains("Packed 3 entries"));

    let packed = ModuleArchive::read(&archive).unwrap();
    assert_eq!(packed.entry(MANIFEST_PATH).map(|e| e.modified_ms), Some(1_700_000_000_000));

    let output = typeweave_cmd()
        .arg("describe")
        .arg(&archive)
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());
    let descriptor: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(descriptor["name"], "dom");
    assert_eq!(descriptor["version"], "3.1");
    assert_eq!(descriptor["model_version"], "2.0");
    assert_eq!(descriptor["last_update_timestamp"], 1_700_000_000_000i64);

    typeweave_cmd()
        .arg("describe")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("(dom-3.1,t=1700000000000)"));
}

#[test]
fn test_describe_without_pom_fails() {
    let temp_dir = TempDir::new().unwrap();
    let archive = temp_dir.path().join("bare.twar");
    ModuleArchive::new().write(&archive).unwrap();
    typeweave_cmd()
        .arg("describe")
        .arg(&archive)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no pom.xml entry"));
}

#[test]
fn test_assemble_then_inspect() {
    let temp_dir = TempDir::new().unwrap();
    let ty = CompiledType::class("def.lib.Built")
        .with_field(FieldDef::new("count", TypeSig::Int))
        .with_nested(CompiledType::class("Inner"));
    let json_path = temp_dir.path().join("built.json");
    fs::write(&json_path, serde_json::to_string_pretty(&ty).unwrap()).unwrap();
    let type_path = temp_dir.path().join("Built.ctype");

    typeweave_cmd()
        .arg("assemble")
        .arg(&json_path)
        .arg(&type_path)
        .assert()
        .success();

    let output = typeweave_cmd()
        .arg("inspect")
        .arg(&type_path)
        .arg("--type")
        .arg("def.lib.Built$Inner")
        .output()
        .unwrap();
    assert!(output.status.success());
    let inner: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(inner["name"], "def.lib.Built$Inner");
}

#[test]
fn test_assemble_rejects_nested_type() {
    let temp_dir = TempDir::new().unwrap();
    let json_path = temp_dir.path().join("nested.json");
    let ty = CompiledType::class("def.lib.Outer$Inner");
    fs::write(&json_path, serde_json::to_string(&ty).unwrap()).unwrap();

    typeweave_cmd()
        .arg("assemble")
        .arg(&json_path)
        .arg(temp_dir.path().join("x.ctype"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("is a nested type"));
}

#[test]
fn test_inspect_archive_lists_types() {
    let temp_dir = TempDir::new().unwrap();
    let module = temp_dir.path().join("module");
    write_type(&module, &CompiledType::class("def.a.B"));
    write_type(&module, &CompiledType::class("def.a.A"));
    let archive = temp_dir.path().join("module.twar");
    ModuleArchive::from_dir(&module).unwrap().write(&archive).unwrap();

    let output = typeweave_cmd().arg("inspect").arg(&archive).output().unwrap();
    assert!(output.status.success());
    let listed: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listed, serde_json::json!(["def.a.A", "def.a.B"]));

    typeweave_cmd()
        .arg("inspect")
        .arg(&archive)
        .arg("--type")
        .arg("def.a.Missing")
        .assert()
        .failure();
}
