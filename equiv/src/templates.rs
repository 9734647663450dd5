//! Class templates and template parameters. Parameters are structural: they are compared by
//! position and kind, never by name.

use crate::session::Session;
use structeq_core::diagnostics::{DiagArg, DiagId};
use structeq_ir::ast::{CClassTemplate, CDeclId, CDeclKind, CTemplateParamList};

fn pack_kind(is_pack: bool) -> &'static str {
    if is_pack { "a" } else { "not a" }
}

impl Session<'_> {
    pub(crate) fn template_param_lists_equivalent(
        &mut self,
        params1: &CTemplateParamList,
        params2: &CTemplateParamList,
    ) -> bool {
        let (unit1, unit2) = (self.unit1, self.unit2);
        if params1.params.len() != params2.params.len() {
            if self.diag.complain() {
                self.diag
                    .diag2(params2.loc.clone(), DiagId::DifferentNumTemplateParameters)
                    .arg(params1.params.len())
                    .arg(params2.params.len());
                self.diag.diag1(params1.loc.clone(), DiagId::TemplateParameterList);
            }
            return false;
        }
        for (&p1, &p2) in params1.params.iter().zip(&params2.params) {
            let (decl1, decl2) = (&unit1[p1], &unit2[p2]);
            if !decl1.same_kind(decl2) {
                if self.diag.complain() {
                    self.diag.diag2(decl2.loc.clone(), DiagId::DifferentTemplateParameterKind);
                    self.diag.diag1(decl1.loc.clone(), DiagId::TemplateParameterHere);
                }
                return false;
            }
            if !self.decls_equivalent(p1, p2) {
                return false;
            }
        }
        true
    }

    // Both parameters must agree on being a pack.
    fn packs_equivalent(&mut self, d1: CDeclId, is_pack1: bool, d2: CDeclId, is_pack2: bool) -> bool {
        if is_pack1 == is_pack2 {
            return true;
        }
        if self.diag.complain() {
            let (unit1, unit2) = (self.unit1, self.unit2);
            self.diag
                .diag2(unit2[d2].loc.clone(), DiagId::ParameterPackNonPack)
                .arg(pack_kind(is_pack2));
            self.diag
                .diag1(unit1[d1].loc.clone(), DiagId::ParameterPackNonPackHere)
                .arg(pack_kind(is_pack1));
        }
        false
    }

    pub(crate) fn type_parms_equivalent(&mut self, d1: CDeclId, d2: CDeclId) -> bool {
        let (unit1, unit2) = (self.unit1, self.unit2);
        let (CDeclKind::TemplateTypeParm(p1), CDeclKind::TemplateTypeParm(p2)) =
            (&unit1[d1].kind, &unit2[d2].kind)
        else {
            return false;
        };
        if !self.packs_equivalent(d1, p1.is_pack, d2, p2.is_pack) {
            return false;
        }
        let (has1, has2) = (p1.default.is_some(), p2.default.is_some());
        if has1 != has2 {
            if self.diag.complain() {
                let has = |h: bool| if h { "has" } else { "does not have" };
                self.diag
                    .diag2(unit2[d2].loc.clone(), DiagId::DefaultArgumentInconsistent)
                    .arg(has(has2));
                self.diag
                    .diag1(unit1[d1].loc.clone(), DiagId::DefaultArgumentHere)
                    .arg(has(has1));
            }
            return false;
        }
        true
    }

    pub(crate) fn non_type_parms_equivalent(&mut self, d1: CDeclId, d2: CDeclId) -> bool {
        let (unit1, unit2) = (self.unit1, self.unit2);
        let (CDeclKind::NonTypeTemplateParm(p1), CDeclKind::NonTypeTemplateParm(p2)) =
            (&unit1[d1].kind, &unit2[d2].kind)
        else {
            return false;
        };
        if !self.packs_equivalent(d1, p1.is_pack, d2, p2.is_pack) {
            return false;
        }
        if !self.types_equivalent(&p1.typ, &p2.typ) {
            if self.diag.complain() {
                self.diag
                    .diag2(unit2[d2].loc.clone(), DiagId::NonTypeParameterTypeInconsistent)
                    .arg(DiagArg::quoted(unit2.type_name(&p2.typ)))
                    .arg(DiagArg::quoted(unit1.type_name(&p1.typ)));
                self.diag
                    .diag1(unit1[d1].loc.clone(), DiagId::ValueHere)
                    .arg(DiagArg::quoted(unit1.type_name(&p1.typ)));
            }
            return false;
        }
        true
    }

    pub(crate) fn template_template_parms_equivalent(&mut self, d1: CDeclId, d2: CDeclId) -> bool {
        let (unit1, unit2) = (self.unit1, self.unit2);
        let (CDeclKind::TemplateTemplateParm(p1), CDeclKind::TemplateTemplateParm(p2)) =
            (&unit1[d1].kind, &unit2[d2].kind)
        else {
            return false;
        };
        self.packs_equivalent(d1, p1.is_pack, d2, p2.is_pack)
            && self.template_param_lists_equivalent(&p1.params, &p2.params)
    }

    /// Parameter lists first, then the templated records.
    pub(crate) fn class_templates_equivalent(&mut self, ct1: &CClassTemplate, ct2: &CClassTemplate) -> bool {
        self.template_param_lists_equivalent(&ct1.params, &ct2.params)
            && self.decls_equivalent(ct1.templated, ct2.templated)
    }
}
