// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use sublist_app::{
    Dataset, DatasetId, KEY_DESCRIPTION, KEY_FUND_COUNT, KEY_FUNDS, KEY_MEMBER_COUNT,
    KEY_MEMBERS, KEY_RELATED_DATASET_IDS, KEY_RELATED_DATASETS, KEY_RELATED_DATASETS_COUNT,
    KEY_RELATED_SAMPLE_IDS, KEY_RELATED_SAMPLES, KEY_RELATED_SAMPLES_COUNT, KEY_SUBGROUP_ID,
    KEY_SUBGROUP_NAME, KEY_SUBJECT_COUNT, KEY_SUBJECTS, RecordSource, Row, SampleId, SubgroupId,
    UserId, subgroup_columns,
};

pub const SUBGROUP_FILE: &str = "subGroup.json";
pub const DATASET_FILE: &str = "dataset.json";
pub const SAMPLES_DIR: &str = "samples";

const SUBJECT_KEYS: [&str; 4] = ["grantNumber", "title", "name", "id"];
const FUND_KEYS: [&str; 4] = ["fundNumber", "title", "name", "id"];

/// Builds the subgroup listing from the cached RDE export under
/// `<root>/output/rde/data`.
#[derive(Debug, Clone)]
pub struct SubgroupFileSource {
    root: PathBuf,
}

impl SubgroupFileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join("output").join("rde").join("data")
    }

    pub fn subgroup_path(&self) -> PathBuf {
        self.data_dir().join(SUBGROUP_FILE)
    }

    pub fn dataset_path(&self) -> PathBuf {
        self.data_dir().join(DATASET_FILE)
    }

    pub fn sample_path(&self, subgroup: &SubgroupId) -> PathBuf {
        self.data_dir()
            .join(SAMPLES_DIR)
            .join(format!("{}.json", subgroup.as_str()))
    }

    fn build(&self) -> Result<Dataset> {
        let path = self.subgroup_path();
        let Some(payload) = read_json(&path)? else {
            tracing::info!(path = %path.display(), "no subgroup file; listing is empty");
            return Ok(Dataset::new(subgroup_columns(), Vec::new()));
        };

        let users = user_names(&payload);
        let datasets = RelatedDatasets::load(&self.dataset_path());
        let mut rows: Vec<Row> = group_items(&payload)
            .into_iter()
            .map(|item| self.group_row(item, &users, &datasets))
            .collect();
        rows.sort_by(|left, right| {
            (left.text(KEY_SUBGROUP_NAME), left.text(KEY_SUBGROUP_ID))
                .cmp(&(right.text(KEY_SUBGROUP_NAME), right.text(KEY_SUBGROUP_ID)))
        });

        tracing::debug!(rows = rows.len(), users = users.len(), "built subgroup rows");
        Ok(Dataset::new(subgroup_columns(), rows))
    }

    fn group_row(
        &self,
        item: &Map<String, Value>,
        users: &BTreeMap<UserId, String>,
        datasets: &RelatedDatasets,
    ) -> Row {
        let empty = Map::new();
        let attrs = object_field(item, "attributes").unwrap_or(&empty);
        let relationships = object_field(item, "relationships").unwrap_or(&empty);

        let id = SubgroupId::parse(&scalar_text(item.get("id")));
        let name = first_text(&[
            attrs.get("name"),
            attrs.get("nameJa"),
            attrs.get("title"),
            item.get("name"),
        ]);
        let description = first_text(&[
            attrs.get("description"),
            attrs.get("descriptionJa"),
            attrs.get("detail"),
        ]);

        let subjects = coerce_list(attrs.get("subjects"));
        let funds = coerce_list(attrs.get("funds"));

        let members: Vec<String> = unique(
            member_ids(attrs, relationships)
                .into_iter()
                .map(|member| {
                    single_line(users.get(&member).cloned().unwrap_or_else(|| member.to_string()))
                }),
        );

        let grants: BTreeSet<String> = subjects
            .iter()
            .filter_map(|subject| subject.get("grantNumber").and_then(Value::as_str))
            .map(str::trim)
            .filter(|grant| !grant.is_empty())
            .map(str::to_owned)
            .collect();
        let (dataset_ids, dataset_names) = datasets.for_grants(&grants);

        let (sample_ids, sample_names) = match &id {
            Some(id) => self.related_samples(id),
            None => (Vec::new(), Vec::new()),
        };

        Row::new()
            .with(KEY_SUBGROUP_ID, id.as_ref().map(SubgroupId::to_string).unwrap_or_default())
            .with(KEY_SUBGROUP_NAME, name)
            .with(KEY_DESCRIPTION, description)
            .with(KEY_SUBJECTS, join_display(subjects, &SUBJECT_KEYS, "\n"))
            .with(KEY_SUBJECT_COUNT, subjects.len())
            .with(KEY_FUNDS, join_display(funds, &FUND_KEYS, ", "))
            .with(KEY_FUND_COUNT, funds.len())
            .with(KEY_MEMBERS, members.join("\n"))
            .with(KEY_MEMBER_COUNT, members.len())
            .with(KEY_RELATED_DATASETS, dataset_names.join("\n"))
            .with(KEY_RELATED_DATASETS_COUNT, dataset_names.len())
            .with(KEY_RELATED_DATASET_IDS, dataset_ids)
            .with(KEY_RELATED_SAMPLES, sample_names.join("\n"))
            .with(KEY_RELATED_SAMPLES_COUNT, sample_names.len())
            .with(KEY_RELATED_SAMPLE_IDS, sample_ids)
    }

    /// Ids and display names from `samples/<id>.json`, first name winning.
    fn related_samples(&self, subgroup: &SubgroupId) -> (Vec<String>, Vec<String>) {
        let path = self.sample_path(subgroup);
        let payload = match read_json(&path) {
            Ok(Some(payload)) => payload,
            Ok(None) => return (Vec::new(), Vec::new()),
            Err(error) => {
                tracing::warn!(path = %path.display(), error = %format!("{error:#}"), "skipping sample file");
                return (Vec::new(), Vec::new());
            }
        };

        let mut seen = BTreeSet::new();
        let mut ids = Vec::new();
        let mut names = Vec::new();
        let entries = payload
            .get("data")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        for sample in entries.iter().filter_map(Value::as_object) {
            let Some(id) = SampleId::parse(&scalar_text(sample.get("id"))) else {
                continue;
            };
            let display = object_field(sample, "attributes")
                .and_then(|attrs| attrs.get("names"))
                .and_then(Value::as_array)
                .and_then(|names| names.first())
                .map(|name| single_line(scalar_text(Some(name))))
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| id.to_string());
            if seen.insert(id.clone()) {
                ids.push(id.to_string());
                names.push(display);
            }
        }
        (ids, names)
    }
}

impl RecordSource for SubgroupFileSource {
    fn load(&self) -> Result<Dataset> {
        self.build()
            .with_context(|| format!("load subgroups from {}", self.data_dir().display()))
    }
}

/// `dataset.json` entries indexed by grant number.
#[derive(Debug, Default)]
struct RelatedDatasets {
    by_grant: BTreeMap<String, Vec<(String, DatasetId)>>,
}

impl RelatedDatasets {
    fn load(path: &Path) -> Self {
        let payload = match read_json(path) {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                tracing::debug!(path = %path.display(), "no dataset file");
                return Self::default();
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), error = %format!("{error:#}"), "skipping dataset file");
                return Self::default();
            }
        };

        let entries = match &payload {
            Value::Object(map) => map.get("data").and_then(Value::as_array),
            Value::Array(entries) => Some(entries),
            _ => None,
        };
        let mut by_grant: BTreeMap<String, Vec<(String, DatasetId)>> = BTreeMap::new();
        for entry in entries.into_iter().flatten().filter_map(Value::as_object) {
            let Some(attrs) = object_field(entry, "attributes") else {
                continue;
            };
            let Some(grant) = attrs.get("grantNumber").and_then(Value::as_str) else {
                continue;
            };
            let Some(id) = DatasetId::parse(&scalar_text(entry.get("id"))) else {
                continue;
            };
            let name = single_line(scalar_text(attrs.get("name")));
            let name = if name.is_empty() { id.to_string() } else { name };
            by_grant
                .entry(grant.to_owned())
                .or_default()
                .push((name, id));
        }
        Self { by_grant }
    }

    /// Sorted by grant number then name; each dataset id appears once.
    fn for_grants(&self, grants: &BTreeSet<String>) -> (Vec<String>, Vec<String>) {
        let mut seen = BTreeSet::new();
        let mut ids = Vec::new();
        let mut names = Vec::new();
        for grant in grants {
            let Some(entries) = self.by_grant.get(grant) else {
                continue;
            };
            let mut entries = entries.clone();
            entries.sort();
            for (name, id) in entries {
                if seen.insert(id.clone()) {
                    ids.push(id.to_string());
                    names.push(name);
                }
            }
        }
        (ids, names)
    }
}

/// `Ok(None)` when the file does not exist.
fn read_json(path: &Path) -> Result<Option<Value>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
        Err(error) => {
            return Err(error).with_context(|| format!("read {}", path.display()));
        }
    };
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
    serde_json::from_str(text)
        .map(Some)
        .with_context(|| format!("parse {}", path.display()))
}

/// Groups come from `data` and `included`; other resource types are skipped.
fn group_items(payload: &Value) -> Vec<&Map<String, Value>> {
    let mut items: Vec<&Value> = Vec::new();
    match payload {
        Value::Object(map) => {
            match map.get("data") {
                Some(Value::Array(data)) => items.extend(data),
                Some(data @ Value::Object(_)) => items.push(data),
                _ => {}
            }
            if let Some(Value::Array(included)) = map.get("included") {
                items.extend(included);
            }
        }
        Value::Array(entries) => items.extend(entries),
        _ => {}
    }

    items
        .into_iter()
        .filter_map(Value::as_object)
        .filter(|item| {
            let kind = scalar_text(item.get("type"));
            kind.is_empty() || kind == "group"
        })
        .collect()
}

fn user_names(payload: &Value) -> BTreeMap<UserId, String> {
    let included = payload
        .get("included")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    included
        .iter()
        .filter_map(Value::as_object)
        .filter(|item| item.get("type").and_then(Value::as_str) == Some("user"))
        .filter_map(|item| {
            let id = UserId::parse(&scalar_text(item.get("id")))?;
            let name = object_field(item, "attributes")
                .map(|attrs| scalar_text(attrs.get("userName")))
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| id.to_string());
            Some((id, name))
        })
        .collect()
}

/// `roles[].userId` first, then the members relationship, then a plain
/// `members` attribute.
fn member_ids(attrs: &Map<String, Value>, relationships: &Map<String, Value>) -> Vec<UserId> {
    let from_roles: Vec<UserId> = attrs
        .get("roles")
        .and_then(Value::as_array)
        .map(|roles| {
            roles
                .iter()
                .filter_map(Value::as_object)
                .filter_map(|role| UserId::parse(&scalar_text(role.get("userId"))))
                .collect()
        })
        .unwrap_or_default();
    if !from_roles.is_empty() {
        return from_roles;
    }

    let mut members = coerce_list(relationships.get("members"));
    if members.is_empty() {
        members = coerce_list(attrs.get("members"));
    }
    members
        .iter()
        .filter_map(|member| match member {
            Value::Object(map) => UserId::parse(&scalar_text(map.get("id"))),
            other => UserId::parse(&scalar_text(Some(other))),
        })
        .collect()
}

/// Arrays as-is; objects contribute their `data` array.
fn coerce_list(value: Option<&Value>) -> &[Value] {
    match value {
        Some(Value::Array(values)) => values,
        Some(Value::Object(map)) => map
            .get("data")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default(),
        _ => &[],
    }
}

/// One label per entry using the first non-blank preferred key, looked up in
/// `attributes` before the entry itself. Duplicates are dropped.
fn join_display(values: &[Value], prefer_keys: &[&str], separator: &str) -> String {
    let labels = values.iter().filter_map(|value| {
        let label = match value {
            Value::Object(item) => {
                let attrs = object_field(item, "attributes");
                prefer_keys
                    .iter()
                    .map(|key| {
                        let text = scalar_text(attrs.and_then(|attrs| attrs.get(*key)));
                        if text.is_empty() {
                            scalar_text(item.get(*key))
                        } else {
                            text
                        }
                    })
                    .find(|text| !text.is_empty())
                    .unwrap_or_else(|| scalar_text(item.get("id")))
            }
            other => scalar_text(Some(other)),
        };
        let label = single_line(label);
        (!label.is_empty()).then_some(label)
    });
    unique(labels).join(separator)
}

/// Newline-joined cells pair each line with one link, so a display name
/// must never span lines itself.
fn single_line(text: String) -> String {
    if !text.contains(['\r', '\n']) {
        return text;
    }
    text.split(['\r', '\n'])
        .filter(|part| !part.trim().is_empty())
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ")
}

fn unique(values: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    values
        .into_iter()
        .filter(|value| !value.is_empty() && seen.insert(value.clone()))
        .collect()
}

fn object_field<'a>(item: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    item.get(key).and_then(Value::as_object)
}

/// Strings and numbers as trimmed text; anything else is blank.
fn scalar_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.trim().to_owned(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => String::new(),
    }
}

fn first_text(candidates: &[Option<&Value>]) -> String {
    candidates
        .iter()
        .map(|value| scalar_text(*value))
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}
