//! Hand-written records in the shape a code generator would emit.

#![allow(dead_code)]

use persistency::{
    persistent_tracking, DirtyBits, DirtyList, DirtyMap, Dirtyable, FieldKind, Persistent,
    RecordSchema, Trackable,
};
use std::sync::OnceLock;

// --- Metadata ---

pub struct Metadata {
    dirty: DirtyBits,
    pub version: i32,
    pub data: DirtyMap<String, String>,
}

impl Metadata {
    pub const VERSION: usize = 0;
    pub const DATA: usize = 1;

    pub fn new() -> Self {
        Self {
            dirty: DirtyBits::all_set(2),
            version: 0,
            data: DirtyMap::new(),
        }
    }

    pub fn set_version(&mut self, version: i32) {
        self.version = version;
        self.set_field_dirty(Self::VERSION);
    }
}

fn metadata_schema() -> &'static RecordSchema {
    static SCHEMA: OnceLock<RecordSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        RecordSchema::new(
            "org.example.generated.Metadata",
            [("version", FieldKind::Primitive), ("data", FieldKind::Map)],
        )
    })
}

impl Persistent for Metadata {
    fn schema(&self) -> &RecordSchema {
        metadata_schema()
    }

    fn dirty_bits(&self) -> &DirtyBits {
        &self.dirty
    }

    fn dirty_bits_mut(&mut self) -> &mut DirtyBits {
        &mut self.dirty
    }

    fn field(&self, pos: usize) -> Option<&dyn Trackable> {
        match pos {
            Self::VERSION => Some(&self.version),
            Self::DATA => Some(&self.data),
            _ => None,
        }
    }

    fn field_mut(&mut self, pos: usize) -> Option<&mut dyn Trackable> {
        match pos {
            Self::VERSION => Some(&mut self.version),
            Self::DATA => Some(&mut self.data),
            _ => None,
        }
    }

    fn reset_field(&mut self, pos: usize) {
        match pos {
            Self::VERSION => self.version = 0,
            Self::DATA => self.data = DirtyMap::new(),
            _ => {}
        }
    }
}

// --- WebPage ---

pub struct WebPage {
    dirty: DirtyBits,
    pub url: String,
    pub parsed_content: DirtyList<String>,
    pub outlinks: DirtyMap<String, String>,
    pub metadata: Metadata,
}

impl WebPage {
    pub const URL: usize = 0;
    pub const PARSED_CONTENT: usize = 1;
    pub const OUTLINKS: usize = 2;
    pub const METADATA: usize = 3;

    pub fn new(url: &str) -> Self {
        Self {
            dirty: DirtyBits::all_set(4),
            url: url.to_string(),
            parsed_content: DirtyList::new(),
            outlinks: DirtyMap::new(),
            metadata: Metadata::new(),
        }
    }

    pub fn set_url(&mut self, url: &str) {
        self.url = url.to_string();
        self.set_field_dirty(Self::URL);
    }
}

fn webpage_schema() -> &'static RecordSchema {
    static SCHEMA: OnceLock<RecordSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        RecordSchema::new(
            "org.example.generated.WebPage",
            [
                ("url", FieldKind::Primitive),
                ("parsedContent", FieldKind::Array),
                ("outlinks", FieldKind::Map),
                ("metadata", FieldKind::Record),
            ],
        )
    })
}

impl Persistent for WebPage {
    fn schema(&self) -> &RecordSchema {
        webpage_schema()
    }

    fn dirty_bits(&self) -> &DirtyBits {
        &self.dirty
    }

    fn dirty_bits_mut(&mut self) -> &mut DirtyBits {
        &mut self.dirty
    }

    fn field(&self, pos: usize) -> Option<&dyn Trackable> {
        match pos {
            Self::URL => Some(&self.url),
            Self::PARSED_CONTENT => Some(&self.parsed_content),
            Self::OUTLINKS => Some(&self.outlinks),
            Self::METADATA => Some(&self.metadata),
            _ => None,
        }
    }

    fn field_mut(&mut self, pos: usize) -> Option<&mut dyn Trackable> {
        match pos {
            Self::URL => Some(&mut self.url),
            Self::PARSED_CONTENT => Some(&mut self.parsed_content),
            Self::OUTLINKS => Some(&mut self.outlinks),
            Self::METADATA => Some(&mut self.metadata),
            _ => None,
        }
    }

    fn reset_field(&mut self, pos: usize) {
        match pos {
            Self::URL => self.url.clear(),
            Self::PARSED_CONTENT => self.parsed_content = DirtyList::new(),
            Self::OUTLINKS => self.outlinks = DirtyMap::new(),
            Self::METADATA => self.metadata = Metadata::new(),
            _ => {}
        }
    }
}

// --- Employee ---

/// `boss` is a union of null, a name, or another employee.
pub enum Boss {
    Name(String),
    Employee(Box<Employee>),
}

impl Trackable for Boss {
    fn as_dirtyable(&self) -> Option<&dyn Dirtyable> {
        match self {
            Boss::Name(name) => name.as_dirtyable(),
            Boss::Employee(employee) => employee.as_dirtyable(),
        }
    }

    fn as_dirtyable_mut(&mut self) -> Option<&mut dyn Dirtyable> {
        match self {
            Boss::Name(name) => name.as_dirtyable_mut(),
            Boss::Employee(employee) => employee.as_dirtyable_mut(),
        }
    }
}

pub struct Employee {
    dirty: DirtyBits,
    pub name: Option<String>,
    pub date_of_birth: i64,
    pub ssn: String,
    pub salary: i32,
    pub boss: Option<Boss>,
    pub webpage: Option<WebPage>,
}

impl Employee {
    pub const NAME: usize = 0;
    pub const DATE_OF_BIRTH: usize = 1;
    pub const SSN: usize = 2;
    pub const SALARY: usize = 3;
    pub const BOSS: usize = 4;
    pub const WEBPAGE: usize = 5;
    pub const FIELD_COUNT: usize = 6;

    /// A new employee, fully dirty like any freshly built record.
    pub fn new(name: &str, salary: i32) -> Self {
        Self {
            dirty: DirtyBits::all_set(Self::FIELD_COUNT),
            name: Some(name.to_string()),
            date_of_birth: 0,
            ssn: String::new(),
            salary,
            boss: None,
            webpage: None,
        }
    }

    /// A new employee as if just loaded from a store.
    pub fn loaded(name: &str, salary: i32) -> Self {
        let mut employee = Self::new(name, salary);
        employee.clear_dirty();
        employee
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = Some(name.to_string());
        self.set_field_dirty(Self::NAME);
    }

    pub fn set_salary(&mut self, salary: i32) {
        self.salary = salary;
        self.set_field_dirty(Self::SALARY);
    }

    pub fn set_boss(&mut self, boss: Option<Boss>) {
        self.boss = boss;
        self.set_field_dirty(Self::BOSS);
    }

    pub fn set_webpage(&mut self, webpage: Option<WebPage>) {
        self.webpage = webpage;
        self.set_field_dirty(Self::WEBPAGE);
    }

    pub fn boss_employee_mut(&mut self) -> Option<&mut Employee> {
        match self.boss.as_mut() {
            Some(Boss::Employee(boss)) => Some(&mut **boss),
            _ => None,
        }
    }
}

pub fn employee_schema() -> &'static RecordSchema {
    static SCHEMA: OnceLock<RecordSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        RecordSchema::new(
            "org.example.generated.Employee",
            [
                ("name", FieldKind::Union),
                ("dateOfBirth", FieldKind::Primitive),
                ("ssn", FieldKind::Primitive),
                ("salary", FieldKind::Primitive),
                ("boss", FieldKind::Union),
                ("webpage", FieldKind::Union),
            ],
        )
    })
}

impl Persistent for Employee {
    fn schema(&self) -> &RecordSchema {
        employee_schema()
    }

    fn dirty_bits(&self) -> &DirtyBits {
        &self.dirty
    }

    fn dirty_bits_mut(&mut self) -> &mut DirtyBits {
        &mut self.dirty
    }

    fn field(&self, pos: usize) -> Option<&dyn Trackable> {
        match pos {
            Self::NAME => Some(&self.name),
            Self::DATE_OF_BIRTH => Some(&self.date_of_birth),
            Self::SSN => Some(&self.ssn),
            Self::SALARY => Some(&self.salary),
            Self::BOSS => Some(&self.boss),
            Self::WEBPAGE => Some(&self.webpage),
            _ => None,
        }
    }

    fn field_mut(&mut self, pos: usize) -> Option<&mut dyn Trackable> {
        match pos {
            Self::NAME => Some(&mut self.name),
            Self::DATE_OF_BIRTH => Some(&mut self.date_of_birth),
            Self::SSN => Some(&mut self.ssn),
            Self::SALARY => Some(&mut self.salary),
            Self::BOSS => Some(&mut self.boss),
            Self::WEBPAGE => Some(&mut self.webpage),
            _ => None,
        }
    }

    fn reset_field(&mut self, pos: usize) {
        match pos {
            Self::NAME => self.name = None,
            Self::DATE_OF_BIRTH => self.date_of_birth = 0,
            Self::SSN => self.ssn.clear(),
            Self::SALARY => self.salary = 0,
            Self::BOSS => self.boss = None,
            Self::WEBPAGE => self.webpage = None,
            _ => {}
        }
    }
}

persistent_tracking!(Metadata, WebPage, Employee);

pub const EMPLOYEE_MAPPING_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gora-otd>
  <class name="org.example.generated.WebPage" keyClass="java.lang.String" index="webpages">
    <field name="url" docfield="url" type="keyword"/>
  </class>
  <class name="org.example.generated.Employee" keyClass="java.lang.String" index="frontier">
    <field name="name" docfield="name" type="text"/>
    <field name="dateOfBirth" docfield="dateOfBirth" type="long"/>
    <field name="ssn" docfield="ssn" type="text"/>
    <field name="value" docfield="value" type="text"/>
    <field name="salary" docfield="salary" type="integer"/>
    <field name="boss" docfield="boss" type="object"/>
    <field name="webpage" docfield="webpage" type="object"/>
  </class>
</gora-otd>
"#;
