//! Record types, record instances and field access

use super::TypeChecker;
use crate::error::SemanticError;
use crate::symbol::{RecordTypeSymbol, Symbol};
use crate::types::Type;
use bibi_parser::{Identifier, RecordInstanceDeclaration, RecordTypeDeclaration};
use indexmap::IndexMap;

impl TypeChecker<'_> {
    pub(crate) fn check_record_type_declaration(&mut self, declaration: &RecordTypeDeclaration) {
        let name = &declaration.name;
        if !self.context.is_top_level() {
            self.report(
                SemanticError::NestedRecordType {
                    name: name.name.clone(),
                },
                &name.span,
            );
            return;
        }

        let mut fields = IndexMap::new();
        for field in &declaration.fields {
            if fields.contains_key(&field.name.name) {
                self.report(
                    SemanticError::DuplicateField {
                        record: name.name.clone(),
                        field: field.name.name.clone(),
                    },
                    &field.name.span,
                );
                continue;
            }
            fields.insert(field.name.name.clone(), Type::from_type_name(&field.type_name));
        }

        let symbol = RecordTypeSymbol {
            name: name.name.clone(),
            fields,
        };
        self.declare(name, Symbol::RecordType(symbol), false);
    }

    pub(crate) fn check_record_instance_declaration(
        &mut self,
        declaration: &RecordInstanceDeclaration,
    ) {
        let record_type = &declaration.record_type;
        match self.lookup(&record_type.name) {
            Some(Symbol::RecordType(schema)) => {
                let instance = schema.instantiate();
                self.declare(&declaration.name, Symbol::RecordInstance(instance), true);
            }
            _ => self.report(
                SemanticError::UndefinedRecordType {
                    name: record_type.name.clone(),
                },
                &record_type.span,
            ),
        }
    }

    /// Declared type of `record.field`, shared by reads and assignments
    pub(crate) fn field_type(&mut self, record: &Identifier, field: &Identifier) -> Option<Type> {
        match self.lookup(&record.name) {
            Some(Symbol::RecordInstance(instance)) => match instance.fields.get(&field.name) {
                Some(slot) => Some(slot.ty.clone()),
                None => {
                    self.report(
                        SemanticError::FieldNotFound {
                            record_type: instance.record_type.clone(),
                            field: field.name.clone(),
                        },
                        &field.span,
                    );
                    None
                }
            },
            Some(_) => {
                self.report(
                    SemanticError::NotARecord {
                        name: record.name.clone(),
                    },
                    &record.span,
                );
                None
            }
            None => {
                self.report(
                    SemanticError::UndefinedVariable {
                        name: record.name.clone(),
                    },
                    &record.span,
                );
                None
            }
        }
    }
}
