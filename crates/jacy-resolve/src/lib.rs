//! Name and definition resolution.
//!
//! Three passes over the parsed party, strictly in order:
//!
//! 1. [`ModuleTreeBuilder`] allocates a [`Def`] for everything that
//!    introduces a name and builds the module tree with its
//!    per-namespace binding maps (the [`DefTable`]).
//! 2. [`Importer`] resolves use-declarations into re-export bindings,
//!    detecting cycles.
//! 3. [`NameResolver`] walks bodies and signatures with a rib stack,
//!    attaching a [`Res`] to every identifier use.

pub mod def;
pub mod def_table;
pub mod importer;
pub mod module;
pub mod module_tree;
pub mod resolver;

pub use def::{Def, DefId, DefIndex, DefKind, DefVis, Namespace, PerNS, PrimType};
pub use def_table::{DefTable, FuncOverloadId};
pub use importer::Importer;
pub use module::{Module, ModuleId, ModuleKind, NameBinding};
pub use module_tree::ModuleTreeBuilder;
pub use resolver::{NameResolver, Res, ResStorage};

use jacy_ast::Party;
use jacy_message::{MessageHolder, MessageResult};
use jacy_span::Interner;

/// Everything later stages need from resolution.
#[derive(Debug)]
pub struct Resolutions {
    pub def_table: DefTable,
    pub res: ResStorage,
}

/// Run the full resolution pipeline over a parsed party.
pub fn resolve_party(party: &Party, interner: &Interner) -> MessageResult<Resolutions> {
    let mut msg = MessageHolder::new();

    let (def_table, build_messages) = ModuleTreeBuilder::new(interner).build(party).split();
    msg.extend(build_messages);

    let mut def_table = def_table;
    let import_messages = Importer::new(&mut def_table, interner).resolve(party);
    msg.extend(import_messages);

    let (res, resolve_messages) = NameResolver::new(&def_table, interner)
        .resolve(party)
        .split();
    msg.extend(resolve_messages);

    msg.result(Resolutions { def_table, res })
}
