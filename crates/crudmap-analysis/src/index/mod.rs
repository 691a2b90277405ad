//! ProgramModelIndex: lookup tables over the program model.
//!
//! Classes and methods live in arenas addressed by `ClassId`/`MethodId`.
//! Method names and short class names are interned so the resolver's hot
//! lookups hash a `Spur` instead of a string. Every list keeps the order in
//! which the program model presented its entries, which is what makes
//! candidate truncation deterministic.

use lasso::{Rodeo, RodeoReader};
use serde::Serialize;

use crudmap_core::types::{ClassId, FxHashMap, FxHashSet, MethodId, NameId};

use crate::boundaries::has_db_hints;
use crate::model::records::{method_key, method_text};
use crate::model::{CallDescriptor, ClassRecord, FunctionType, MethodRecord, ProgramModel, RawClass};

/// Counts reported after building the index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub classes: usize,
    pub methods: usize,
    pub calls: usize,
    pub skipped_classes: usize,
    pub skipped_methods: usize,
    pub duplicate_methods: usize,
}

/// Read-only lookup structure over one program model.
pub struct ProgramModelIndex {
    classes: Vec<ClassRecord>,
    methods: Vec<MethodRecord>,
    names: RodeoReader,
    class_by_full_name: FxHashMap<String, ClassId>,
    classes_by_short_name: FxHashMap<NameId, Vec<ClassId>>,
    methods_by_class_and_name: FxHashMap<(ClassId, NameId), Vec<MethodId>>,
    methods_by_name: FxHashMap<NameId, Vec<MethodId>>,
    stats: IndexStats,
}

#[derive(Default)]
struct IndexBuilder {
    classes: Vec<ClassRecord>,
    methods: Vec<MethodRecord>,
    names: Rodeo,
    class_by_full_name: FxHashMap<String, ClassId>,
    classes_by_short_name: FxHashMap<NameId, Vec<ClassId>>,
    methods_by_class_and_name: FxHashMap<(ClassId, NameId), Vec<MethodId>>,
    methods_by_name: FxHashMap<NameId, Vec<MethodId>>,
    identities: FxHashSet<(ClassId, NameId, Option<usize>, u32)>,
    stats: IndexStats,
}

impl IndexBuilder {
    fn intern(&mut self, name: &str) -> NameId {
        NameId::from(self.names.get_or_intern(name))
    }

    /// Register a class, or return the existing id when the same full name
    /// was seen in another file. Declared type references are merged.
    fn add_class(&mut self, raw: &RawClass, file: Option<&str>) -> Option<ClassId> {
        let short_name = raw.name.as_deref()?.trim();
        if short_name.is_empty() {
            return None;
        }
        let full_name = match (&raw.full_name, &raw.package) {
            (Some(full), _) => full.trim().to_string(),
            (None, Some(package)) => format!("{}.{}", package.trim(), short_name),
            (None, None) => short_name.to_string(),
        };

        if let Some(&id) = self.class_by_full_name.get(&full_name) {
            let class = &mut self.classes[id.index()];
            for t in &raw.dependencies.type_references {
                if !class.type_references.contains(t) {
                    class.type_references.push(t.clone());
                }
            }
            return Some(id);
        }

        let id = ClassId::new(self.classes.len());
        let short_name_id = self.intern(short_name);
        self.class_by_full_name.insert(full_name.clone(), id);
        self.classes_by_short_name.entry(short_name_id).or_default().push(id);
        self.classes.push(ClassRecord {
            id,
            full_name,
            short_name: short_name.to_string(),
            short_name_id,
            package: raw.package.clone(),
            function_type: FunctionType::parse(raw.function_type.as_deref()),
            genexus_type: raw.genexus_type.clone(),
            type_references: raw.dependencies.type_references.clone(),
            methods: Vec::new(),
            file: file.map(str::to_string),
        });
        Some(id)
    }

    fn add_methods(&mut self, class: ClassId, raw: &RawClass) {
        for raw_method in &raw.methods {
            let Some(name) = raw_method.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
            else {
                self.stats.skipped_methods += 1;
                continue;
            };
            let name_id = self.intern(name);
            let param_count = raw_method.param_count.and_then(|n| usize::try_from(n).ok());
            let start_line = raw_method
                .start_line
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0);

            if !self.identities.insert((class, name_id, param_count, start_line)) {
                self.stats.duplicate_methods += 1;
                continue;
            }

            let text = method_text(
                raw_method.code.as_deref(),
                raw_method.signature.as_deref(),
                &raw_method.sql_strings,
            );
            let calls: Vec<CallDescriptor> =
                raw_method.calls.iter().filter_map(CallDescriptor::from_raw).collect();
            self.stats.calls += calls.len();

            let id = MethodId::new(self.methods.len());
            self.methods.push(MethodRecord {
                id,
                class,
                name: name.to_string(),
                name_id,
                param_count,
                start_line,
                has_db_hints: has_db_hints(&text),
                text,
                sql_literal_count: raw_method.sql_strings.len(),
                calls,
            });
            self.classes[class.index()].methods.push(id);
            self.methods_by_class_and_name.entry((class, name_id)).or_default().push(id);
            self.methods_by_name.entry(name_id).or_default().push(id);
        }
    }

    fn finish(mut self) -> ProgramModelIndex {
        self.stats.classes = self.classes.len();
        self.stats.methods = self.methods.len();
        ProgramModelIndex {
            classes: self.classes,
            methods: self.methods,
            names: self.names.into_reader(),
            class_by_full_name: self.class_by_full_name,
            classes_by_short_name: self.classes_by_short_name,
            methods_by_class_and_name: self.methods_by_class_and_name,
            methods_by_name: self.methods_by_name,
            stats: self.stats,
        }
    }
}

impl ProgramModelIndex {
    /// Build the index. Classes and methods without a name are skipped; a
    /// method whose (class, name, parameter count, start line) repeats an
    /// earlier one is dropped.
    pub fn build(model: &ProgramModel) -> Self {
        let mut builder = IndexBuilder::default();
        for file in &model.files {
            for raw_class in &file.classes {
                match builder.add_class(raw_class, file.path.as_deref()) {
                    Some(class) => builder.add_methods(class, raw_class),
                    None => builder.stats.skipped_classes += 1,
                }
            }
        }
        let index = builder.finish();
        tracing::info!(
            classes = index.stats.classes,
            methods = index.stats.methods,
            calls = index.stats.calls,
            skipped_classes = index.stats.skipped_classes,
            skipped_methods = index.stats.skipped_methods,
            duplicate_methods = index.stats.duplicate_methods,
            "program index built"
        );
        index
    }

    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    pub fn class(&self, id: ClassId) -> &ClassRecord {
        &self.classes[id.index()]
    }

    pub fn method(&self, id: MethodId) -> &MethodRecord {
        &self.methods[id.index()]
    }

    pub fn classes(&self) -> &[ClassRecord] {
        &self.classes
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    /// The class that owns `method`.
    pub fn owner(&self, method: MethodId) -> &ClassRecord {
        self.class(self.method(method).class)
    }

    /// Interned id for a name, if any class or method carries it.
    pub fn name_id(&self, name: &str) -> Option<NameId> {
        self.names.get(name).map(NameId::from)
    }

    pub fn class_by_full_name(&self, full_name: &str) -> Option<ClassId> {
        self.class_by_full_name.get(full_name).copied()
    }

    /// Classes whose short name is `short_name`, in model order.
    pub fn classes_named(&self, short_name: &str) -> &[ClassId] {
        self.name_id(short_name)
            .and_then(|id| self.classes_by_short_name.get(&id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Overloads of `name` declared in `class`, in model order.
    pub fn methods_in_class(&self, class: ClassId, name: NameId) -> &[MethodId] {
        self.methods_by_class_and_name
            .get(&(class, name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every method named `name`, across all classes, in model order.
    pub fn methods_named(&self, name: NameId) -> &[MethodId] {
        self.methods_by_name
            .get(&name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Classes whose `function_type` marks them as entry points, in model order.
    pub fn entry_classes(&self) -> impl Iterator<Item = &ClassRecord> {
        self.classes.iter().filter(|c| c.function_type.is_entry())
    }

    /// `{class}::{name}({params})@{line}` identity string for a method.
    pub fn method_key(&self, id: MethodId) -> String {
        let m = self.method(id);
        method_key(&self.class(m.class).full_name, &m.name, m.param_count, m.start_line)
    }
}
