//! Graphviz emission shared by the AIG and BDD engines.
//!
//! The options object is JSON with two recognized keys:
//!
//! - `attr`: a map of `"group:name"` to `"value"`, where group is one of
//!   `graph, root, node, terminal, terminal0, terminal1, edge, edge0,
//!   edge1`. A key with no group prefix applies to every group except
//!   `graph`.
//! - `var_label` / `var_texlbl`: arrays of strings indexed by variable id.
use std::collections::BTreeMap;
use std::fmt::Write;
use fxhash::FxHashMap;
use json::JsonValue;
use crate::err::{Error, Result};

/// attribute name -> value. BTreeMap keeps the emitted text stable.
pub type AttrList = BTreeMap<String, String>;

/// Parsed dot options plus the default styling.
pub struct DotOpts {
  pub graph: AttrList,
  pub root: AttrList,
  pub node: AttrList,
  pub terminal: AttrList,
  pub terminal0: AttrList,
  pub terminal1: AttrList,
  pub edge: AttrList,
  pub edge0: AttrList,
  pub edge1: AttrList,
  pub var_label: FxHashMap<u32, String>,
  pub var_texlbl: FxHashMap<u32, String>,
}

fn attrs(pairs: &[(&str, &str)])->AttrList {
  pairs.iter().map(|&(k, v)| (k.to_string(), v.to_string())).collect() }

impl Default for DotOpts {
  fn default()->Self {
    DotOpts {
      graph: attrs(&[("rankdir", "TB"), ("bgcolor", "beige")]),
      root: attrs(&[("shape", "box")]),
      node: attrs(&[("shape", "circle")]),
      terminal: attrs(&[("shape", "box"), ("style", "filled")]),
      terminal0: attrs(&[("color", "mediumpurple")]),
      terminal1: attrs(&[]),
      edge: attrs(&[]),
      edge0: attrs(&[("style", "dashed"), ("color", "blue")]),
      edge1: attrs(&[("style", "solid"), ("color", "red")]),
      var_label: FxHashMap::default(),
      var_texlbl: FxHashMap::default() }}}

impl DotOpts {
  /// parse a JSON options object on top of the defaults.
  pub fn parse(option: &JsonValue)->Result<DotOpts> {
    let mut opts = DotOpts::default();
    if option.is_null() { return Ok(opts) }
    if !option.is_object() {
      return Err(Error::invalid_argument("dot options should be a JSON object")) }
    let attr = &option["attr"];
    if !attr.is_null() {
      if !attr.is_object() {
        return Err(Error::invalid_argument("'attr' should be a JSON object")) }
      for (name, val) in attr.entries() {
        let val = val.as_str()
          .ok_or_else(|| Error::invalid_argument("attr value should be a string"))?;
        opts.set_attr(name, val)?; }}
    Self::parse_labels(&option["var_label"], "var_label", &mut opts.var_label)?;
    Self::parse_labels(&option["var_texlbl"], "var_texlbl", &mut opts.var_texlbl)?;
    Ok(opts) }

  fn parse_labels(obj: &JsonValue, name: &str, dict: &mut FxHashMap<u32, String>)->Result<()> {
    if obj.is_null() { return Ok(()) }
    if !obj.is_array() {
      return Err(Error::invalid_argument(format!("'{}' should be a JSON array", name))) }
    for (i, item) in obj.members().enumerate() {
      let label = item.as_str()
        .ok_or_else(|| Error::invalid_argument(format!("'{}' entries should be strings", name)))?;
      dict.insert(i as u32, label.to_string()); }
    Ok(()) }

  fn set_attr(&mut self, name: &str, val: &str)->Result<()> {
    match name.split_once(':') {
      None => {
        // no group prefix: apply to every drawable group.
        for list in [&mut self.root, &mut self.node,
                     &mut self.terminal, &mut self.terminal0, &mut self.terminal1,
                     &mut self.edge, &mut self.edge0, &mut self.edge1] {
          list.insert(name.to_string(), val.to_string()); }}
      Some((group, attr)) => {
        let list = match group {
          "graph" => &mut self.graph,
          "root" => &mut self.root,
          "node" => &mut self.node,
          "terminal" => &mut self.terminal,
          "terminal0" => &mut self.terminal0,
          "terminal1" => &mut self.terminal1,
          "edge" => &mut self.edge,
          "edge0" => &mut self.edge0,
          "edge1" => &mut self.edge1,
          _ => return Err(Error::invalid_argument(format!("{}: unknown group name", group))) };
        list.insert(attr.to_string(), val.to_string()); }}
    Ok(()) }

  /// attributes for the 0-terminal (terminal + terminal0 overrides).
  pub fn terminal0_attrs(&self)->AttrList { merged(&self.terminal, &self.terminal0) }
  /// attributes for the 1-terminal (terminal + terminal1 overrides).
  pub fn terminal1_attrs(&self)->AttrList { merged(&self.terminal, &self.terminal1) }
  /// attributes for a 0-branch edge (edge + edge0 overrides).
  pub fn edge0_attrs(&self)->AttrList { merged(&self.edge, &self.edge0) }
  /// attributes for a 1-branch edge (edge + edge1 overrides).
  pub fn edge1_attrs(&self)->AttrList { merged(&self.edge, &self.edge1) }

  /// the label for a variable: `var_label`, then `var_texlbl` (as texlbl).
  pub fn label_attrs(&self, var: u32, base: &AttrList)->AttrList {
    let mut list = base.clone();
    if let Some(l) = self.var_label.get(&var) { list.insert("label".to_string(), l.clone()); }
    if let Some(l) = self.var_texlbl.get(&var) { list.insert("texlbl".to_string(), l.clone()); }
    list }}

fn merged(base: &AttrList, over: &AttrList)->AttrList {
  let mut list = base.clone();
  for (k, v) in over { list.insert(k.clone(), v.clone()); }
  list }

/// Low-level dot text emitter.
pub struct DotWriter<'a> { w: &'a mut dyn Write }

impl<'a> DotWriter<'a> {
  pub fn new(w: &'a mut dyn Write)->Self { DotWriter { w }}

  fn attr_text(list: &AttrList)->String {
    if list.is_empty() { return String::new() }
    let body: Vec<String> = list.iter().map(|(k, v)| format!("{} = \"{}\"", k, v)).collect();
    format!(" [{}]", body.join(", ")) }

  pub fn graph_begin(&mut self, name: &str, attr_list: &AttrList) {
    writeln!(self.w, "digraph {} {{", name).unwrap();
    for (k, v) in attr_list {
      writeln!(self.w, "  {} = \"{}\";", k, v).unwrap(); }}

  pub fn graph_end(&mut self) { writeln!(self.w, "}}").unwrap(); }

  pub fn write_node(&mut self, name: &str, attr_list: &AttrList) {
    writeln!(self.w, "  {}{};", name, Self::attr_text(attr_list)).unwrap(); }

  pub fn write_edge(&mut self, from: &str, to: &str, attr_list: &AttrList) {
    writeln!(self.w, "  {} -> {}{};", from, to, Self::attr_text(attr_list)).unwrap(); }

  pub fn write_rank_group(&mut self, nodes: &[String], rank: &str) {
    write!(self.w, "  {{ rank = {};", rank).unwrap();
    for n in nodes { write!(self.w, " {};", n).unwrap(); }
    writeln!(self.w, " }}").unwrap(); }}

#[test] fn test_dot_opts() {
  let opt = json::parse(
    r#"{"attr": {"graph:bgcolor": "white", "color": "gray"}, "var_label": ["a", "b"]}"#)
    .unwrap();
  let opts = DotOpts::parse(&opt).unwrap();
  assert_eq!(opts.graph.get("bgcolor").unwrap(), "white");
  assert_eq!(opts.node.get("color").unwrap(), "gray", "ungrouped attr applies to nodes");
  assert_eq!(opts.edge1.get("color").unwrap(), "gray", "ungrouped attr applies to edges");
  assert_eq!(opts.var_label.get(&1).unwrap(), "b"); }

#[test] fn test_bad_group() {
  let opt = json::parse(r#"{"attr": {"frob:color": "red"}}"#).unwrap();
  assert!(DotOpts::parse(&opt).is_err()); }
