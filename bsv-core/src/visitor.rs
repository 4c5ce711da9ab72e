#![forbid(unsafe_code)]

use bsv_ast::{DeclId, DeclarationKind, Declarations};

use crate::error::CoreError;

/// Variant-directed callbacks over declarations.
///
/// [`dispatch`] calls `visit_declaration` for every declaration and then exactly
/// one variant callback. Unoverridden callbacks do nothing.
pub trait DeclarationVisitor {
    fn visit_declaration(&mut self, _decls: &Declarations, _id: DeclId) -> Result<(), CoreError> {
        Ok(())
    }

    fn visit_enum_declaration(&mut self, _decls: &Declarations, _id: DeclId) -> Result<(), CoreError> {
        Ok(())
    }

    fn visit_function_definition(&mut self, _decls: &Declarations, _id: DeclId) -> Result<(), CoreError> {
        Ok(())
    }

    fn visit_interface_declaration(&mut self, _decls: &Declarations, _id: DeclId) -> Result<(), CoreError> {
        Ok(())
    }

    fn visit_method_declaration(&mut self, _decls: &Declarations, _id: DeclId) -> Result<(), CoreError> {
        Ok(())
    }

    fn visit_module_definition(&mut self, _decls: &Declarations, _id: DeclId) -> Result<(), CoreError> {
        Ok(())
    }

    fn visit_struct_declaration(&mut self, _decls: &Declarations, _id: DeclId) -> Result<(), CoreError> {
        Ok(())
    }

    fn visit_type_synonym_declaration(&mut self, _decls: &Declarations, _id: DeclId) -> Result<(), CoreError> {
        Ok(())
    }

    fn visit_union_declaration(&mut self, _decls: &Declarations, _id: DeclId) -> Result<(), CoreError> {
        Ok(())
    }
}

pub fn dispatch(
    visitor: &mut dyn DeclarationVisitor,
    decls: &Declarations,
    id: DeclId,
) -> Result<(), CoreError> {
    visitor.visit_declaration(decls, id)?;
    match &decls.get(id).kind {
        DeclarationKind::Enum { .. } => visitor.visit_enum_declaration(decls, id),
        DeclarationKind::Function => visitor.visit_function_definition(decls, id),
        DeclarationKind::Interface { .. } => visitor.visit_interface_declaration(decls, id),
        DeclarationKind::Method => visitor.visit_method_declaration(decls, id),
        DeclarationKind::Module => visitor.visit_module_definition(decls, id),
        DeclarationKind::Struct { .. } => visitor.visit_struct_declaration(decls, id),
        DeclarationKind::TypeSynonym { .. } => visitor.visit_type_synonym_declaration(decls, id),
        DeclarationKind::Union { .. } => visitor.visit_union_declaration(decls, id),
        DeclarationKind::Value => Ok(()),
    }
}
