// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use sublist_app::{
    Column, Dataset, KEY_DESCRIPTION, KEY_FUND_COUNT, KEY_FUNDS, KEY_MEMBER_COUNT, KEY_MEMBERS,
    KEY_RELATED_DATASET_IDS, KEY_RELATED_DATASETS, KEY_RELATED_DATASETS_COUNT,
    KEY_RELATED_SAMPLE_IDS, KEY_RELATED_SAMPLES, KEY_RELATED_SAMPLES_COUNT, KEY_SUBGROUP_ID,
    KEY_SUBGROUP_NAME, KEY_SUBJECT_COUNT, KEY_SUBJECTS, RecordSource, Row, subgroup_columns,
};

const GROUP_TOPICS: [&str; 10] = [
    "Catalysis",
    "Thin Films",
    "Battery Materials",
    "Polymer Science",
    "Magnetism",
    "Superconductors",
    "Ceramics",
    "Photonics",
    "Metallurgy",
    "Nanostructures",
];

const GROUP_SUFFIXES: [&str; 5] = ["Lab", "Team", "Consortium", "Working Group", "Unit"];

const FIRST_NAMES: [&str; 12] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Rowan",
];
const LAST_NAMES: [&str; 12] = [
    "Sato", "Suzuki", "Walker", "Tanaka", "Lopez", "Ito", "Reed", "Kato", "Diaz", "Mori",
    "Turner", "Abe",
];

const GRANT_PREFIXES: [&str; 4] = ["JPMXP1222", "JPMXP1223", "JPMXP1224", "JPMXP1225"];
const FUND_PREFIXES: [&str; 3] = ["KAKENHI", "JST", "NEDO"];
const SAMPLE_KINDS: [&str; 6] = ["Powder", "Wafer", "Pellet", "Film", "Crystal", "Fiber"];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// A subgroup as it appears on disk and in the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeSubgroup {
    pub id: String,
    pub name: String,
    pub description: String,
    pub grant_numbers: Vec<String>,
    pub funds: Vec<String>,
    pub members: Vec<(String, String)>,
    pub datasets: Vec<(String, String)>,
    pub samples: Vec<(String, String)>,
}

impl FakeSubgroup {
    /// The row the file source is expected to build for this subgroup.
    pub fn to_row(&self) -> Row {
        let member_names: Vec<String> = self.members.iter().map(|(_, name)| name.clone()).collect();
        let dataset_names: Vec<String> =
            self.datasets.iter().map(|(_, name)| name.clone()).collect();
        let sample_names: Vec<String> = self.samples.iter().map(|(_, name)| name.clone()).collect();
        Row::new()
            .with(KEY_SUBGROUP_ID, self.id.as_str())
            .with(KEY_SUBGROUP_NAME, self.name.as_str())
            .with(KEY_DESCRIPTION, self.description.as_str())
            .with(KEY_SUBJECTS, self.grant_numbers.join("\n"))
            .with(KEY_SUBJECT_COUNT, self.grant_numbers.len())
            .with(KEY_FUNDS, self.funds.join(", "))
            .with(KEY_FUND_COUNT, self.funds.len())
            .with(KEY_MEMBERS, member_names.join("\n"))
            .with(KEY_MEMBER_COUNT, self.members.len())
            .with(KEY_RELATED_DATASETS, dataset_names.join("\n"))
            .with(KEY_RELATED_DATASETS_COUNT, self.datasets.len())
            .with(
                KEY_RELATED_DATASET_IDS,
                self.datasets.iter().map(|(id, _)| id.clone()).collect::<Vec<_>>(),
            )
            .with(KEY_RELATED_SAMPLES, sample_names.join("\n"))
            .with(KEY_RELATED_SAMPLES_COUNT, self.samples.len())
            .with(
                KEY_RELATED_SAMPLE_IDS,
                self.samples.iter().map(|(id, _)| id.clone()).collect::<Vec<_>>(),
            )
    }
}

#[derive(Debug, Clone)]
pub struct SubgroupFaker {
    rng: DeterministicRng,
    next_id: usize,
}

impl SubgroupFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_id: 0,
        }
    }

    pub fn subgroup(&mut self) -> FakeSubgroup {
        self.next_id += 1;
        let ordinal = self.next_id;
        let id = format!("grp-{ordinal:04}");
        let name = format!(
            "{} {} {ordinal}",
            self.pick(&GROUP_TOPICS),
            self.pick(&GROUP_SUFFIXES)
        );

        let grant_prefix = self.pick(&GRANT_PREFIXES);
        let grant_numbers = (0..1 + self.rng.int_n(3))
            .map(|index| format!("{grant_prefix}TU{:04}", ordinal * 10 + index))
            .collect::<Vec<_>>();
        let funds = (0..self.rng.int_n(4))
            .map(|index| format!("{}-{ordinal}{index}", self.pick(&FUND_PREFIXES)))
            .collect();
        // Distinct first names keep member names unique within a group.
        let first_offset = self.rng.int_n(FIRST_NAMES.len());
        let members = (0..1 + self.rng.int_n(6))
            .map(|index| {
                let first = FIRST_NAMES[(first_offset + index) % FIRST_NAMES.len()];
                let name = format!("{first} {}", self.pick(&LAST_NAMES));
                (format!("user-{ordinal}-{index}"), name)
            })
            .collect();
        let datasets = grant_numbers
            .iter()
            .enumerate()
            .map(|(index, grant)| (format!("ds-{ordinal}-{index}"), format!("{grant} dataset")))
            .collect();
        let samples = (0..self.rng.int_n(3))
            .map(|index| {
                (
                    format!("smp-{ordinal}-{index}"),
                    format!("{} {ordinal}-{index}", self.pick(&SAMPLE_KINDS)),
                )
            })
            .collect();

        FakeSubgroup {
            id,
            name,
            description: format!("Shared workspace for group {ordinal}"),
            grant_numbers,
            funds,
            members,
            datasets,
            samples,
        }
    }

    pub fn subgroups(&mut self, count: usize) -> Vec<FakeSubgroup> {
        (0..count).map(|_| self.subgroup()).collect()
    }

    fn pick(&mut self, values: &[&'static str]) -> &'static str {
        values[self.rng.int_n(values.len())]
    }
}

/// Listing dataset for `groups`, in the order given.
pub fn subgroup_dataset(groups: &[FakeSubgroup]) -> Dataset {
    Dataset::new(
        subgroup_columns(),
        groups.iter().map(FakeSubgroup::to_row).collect(),
    )
}

/// Two columns, `n` holding 1..=count and `name` holding `row <n>`.
pub fn numbered_dataset(count: usize) -> Dataset {
    Dataset::new(
        vec![Column::new("n", "N"), Column::new("name", "Name")],
        (1..=count)
            .map(|n| Row::new().with("n", n).with("name", format!("row {n}")))
            .collect(),
    )
}

/// On-disk layout the file source reads, rooted in a temp dir.
#[derive(Debug)]
pub struct RdeFixture {
    dir: tempfile::TempDir,
}

impl RdeFixture {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create temp dir")?;
        fs::create_dir_all(data_dir(dir.path()).join("samples"))
            .context("create fixture data dir")?;
        Ok(Self { dir })
    }

    /// Writes subGroup.json, dataset.json and one samples file per group.
    pub fn with_subgroups(groups: &[FakeSubgroup]) -> Result<Self> {
        let fixture = Self::new()?;
        fixture.write_subgroups(groups)?;
        fixture.write_datasets(groups)?;
        for group in groups {
            fixture.write_samples(group)?;
        }
        Ok(fixture)
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn data_dir(&self) -> PathBuf {
        data_dir(self.dir.path())
    }

    pub fn write_subgroups(&self, groups: &[FakeSubgroup]) -> Result<()> {
        self.write_json("subGroup.json", &subgroup_document(groups))
    }

    pub fn write_datasets(&self, groups: &[FakeSubgroup]) -> Result<()> {
        self.write_json("dataset.json", &dataset_document(groups))
    }

    pub fn write_samples(&self, group: &FakeSubgroup) -> Result<()> {
        let data: Vec<Value> = group
            .samples
            .iter()
            .map(|(id, name)| {
                json!({
                    "id": id,
                    "type": "sample",
                    "attributes": { "names": [name] },
                })
            })
            .collect();
        self.write_json(&format!("samples/{}.json", group.id), &json!({ "data": data }))
    }

    pub fn write_json(&self, relative: &str, value: &Value) -> Result<()> {
        let text = serde_json::to_string_pretty(value).context("encode fixture json")?;
        self.write_raw(relative, &text)
    }

    pub fn write_raw(&self, relative: &str, text: &str) -> Result<()> {
        let path = self.data_dir().join(relative);
        fs::write(&path, text).with_context(|| format!("write {}", path.display()))
    }

    pub fn remove(&self, relative: &str) -> Result<()> {
        let path = self.data_dir().join(relative);
        fs::remove_file(&path).with_context(|| format!("remove {}", path.display()))
    }
}

fn data_dir(root: &Path) -> PathBuf {
    root.join("output").join("rde").join("data")
}

/// JSON:API document with groups in `data` and users in `included`.
pub fn subgroup_document(groups: &[FakeSubgroup]) -> Value {
    let data: Vec<Value> = groups
        .iter()
        .map(|group| {
            let roles: Vec<Value> = group
                .members
                .iter()
                .map(|(user_id, _)| json!({ "userId": user_id, "role": "member" }))
                .collect();
            let subjects: Vec<Value> = group
                .grant_numbers
                .iter()
                .map(|grant| json!({ "grantNumber": grant, "title": format!("{grant} title") }))
                .collect();
            let funds: Vec<Value> = group
                .funds
                .iter()
                .map(|fund| json!({ "fundNumber": fund }))
                .collect();
            json!({
                "id": group.id,
                "type": "group",
                "attributes": {
                    "name": group.name,
                    "description": group.description,
                    "subjects": subjects,
                    "funds": funds,
                    "roles": roles,
                },
            })
        })
        .collect();
    let included: Vec<Value> = groups
        .iter()
        .flat_map(|group| group.members.iter())
        .map(|(user_id, name)| {
            json!({
                "id": user_id,
                "type": "user",
                "attributes": { "userName": name },
            })
        })
        .collect();
    json!({ "data": data, "included": included })
}

pub fn dataset_document(groups: &[FakeSubgroup]) -> Value {
    let data: Vec<Value> = groups
        .iter()
        .flat_map(|group| group.datasets.iter().zip(group.grant_numbers.iter()))
        .map(|((id, name), grant)| {
            json!({
                "id": id,
                "type": "dataset",
                "attributes": { "name": name, "grantNumber": grant },
            })
        })
        .collect();
    json!({ "data": data })
}

/// Returns a fixed dataset and counts how often it was asked.
#[derive(Debug)]
pub struct StaticSource {
    dataset: Dataset,
    calls: AtomicUsize,
}

impl StaticSource {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RecordSource for StaticSource {
    fn load(&self) -> Result<Dataset> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.dataset.clone())
    }
}

/// Always fails with `message`.
#[derive(Debug)]
pub struct FailingSource {
    message: String,
}

impl FailingSource {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl RecordSource for FailingSource {
    fn load(&self) -> Result<Dataset> {
        Err(anyhow!("{}", self.message))
    }
}

/// Each load blocks until the test pushes an outcome through the gate.
#[derive(Debug)]
pub struct GatedSource {
    gate: Mutex<Receiver<Result<Dataset>>>,
    calls: AtomicUsize,
}

#[derive(Debug, Clone)]
pub struct Gate {
    tx: Sender<Result<Dataset>>,
}

impl Gate {
    pub fn release(&self, dataset: Dataset) -> Result<()> {
        self.tx
            .send(Ok(dataset))
            .map_err(|_| anyhow!("gated source dropped"))
    }

    pub fn fail(&self, message: &str) -> Result<()> {
        self.tx
            .send(Err(anyhow!("{message}")))
            .map_err(|_| anyhow!("gated source dropped"))
    }
}

impl GatedSource {
    pub fn new() -> (Arc<Self>, Gate) {
        let (tx, rx) = mpsc::channel();
        let source = Arc::new(Self {
            gate: Mutex::new(rx),
            calls: AtomicUsize::new(0),
        });
        (source, Gate { tx })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RecordSource for GatedSource {
    fn load(&self) -> Result<Dataset> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self
            .gate
            .lock()
            .map_err(|_| anyhow!("gate lock poisoned"))?;
        gate.recv().context("gate closed")?
    }
}
