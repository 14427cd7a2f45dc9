//! Binary dump/restore, tabular display, and graphviz output.
//!
//! The dump stream starts with the ASCII signature `ym_bdd1.0` and a BDD
//! count, then one varint per root edge, then the node records in
//! reverse-topological order (children always precede their parents), one
//! `(level, edge0, edge1)` triple per node with the edges delta-encoded
//! against the record index. Constants encode as the literal values 0
//! and 1, and `(0, 0, 0)` terminates the stream.
use std::fmt;
use fxhash::FxHashMap;
use json::JsonValue;
use crate::binio::{BinDec, BinEnc};
use crate::dot::{DotOpts, DotWriter};
use crate::err::{Error, Result};
use super::{BddBase, BddEdge};

const BDD_SIG: &str = "ym_bdd1.0";

/// Numbers the nodes reachable from a root list, children before
/// parents, ids starting at 1.
pub(crate) struct NodeCollector {
  pub node_list: Vec<u32>,
  node_map: FxHashMap<u32, u64>,
}

impl NodeCollector {
  pub fn new(base: &BddBase, roots: &[BddEdge])->NodeCollector {
    let mut nc = NodeCollector { node_list: vec![], node_map: FxHashMap::default() };
    for &root in roots { nc.collect(base, root); }
    nc }

  fn collect(&mut self, base: &BddBase, e: BddEdge) {
    if e.is_const() { return }
    let id = e.node();
    if self.node_map.contains_key(&id) { return }
    let node = base.node(id);
    self.collect(base, node.e0);
    self.collect(base, node.e1);
    // number after the children so every edge points backwards.
    self.node_list.push(id);
    self.node_map.insert(id, self.node_list.len() as u64); }

  pub fn node_id(&self, id: u32)->u64 { self.node_map[&id] }

  /// an edge as an integer: 0/1 for constants, else 2*id + inv.
  pub fn edge2int(&self, e: BddEdge)->u64 {
    if e.is_zero() { return 0 }
    if e.is_one() { return 1 }
    self.node_id(e.node()) * 2 + e.inv() as u64 }}

/// write several BDDs as one stream.
pub(crate) fn dump(base: &BddBase, w: &mut dyn std::io::Write, roots: &[BddEdge])->Result<()> {
  let nc = NodeCollector::new(base, roots);
  let mut enc = BinEnc::new(w);
  enc.write_signature(BDD_SIG)?;
  enc.write_vint(roots.len() as u64)?;
  for &root in roots {
    enc.write_vint(nc.edge2int(root))?; }
  for (pos, &id) in nc.node_list.iter().enumerate() {
    let my_id = pos as u64 + 1;
    let node = base.node(id);
    enc.write_vint(node.level as u64)?;
    dump_edge(&mut enc, &nc, my_id, node.e0)?;
    dump_edge(&mut enc, &nc, my_id, node.e1)?; }
  // end marker
  enc.write_vint(0)?;
  enc.write_vint(0)?;
  enc.write_vint(0) }

fn dump_edge(enc: &mut BinEnc, nc: &NodeCollector, my_id: u64, e: BddEdge)->Result<()> {
  if e.is_const() { return enc.write_vint(e.packed) }
  let delta = my_id - nc.node_id(e.node());
  enc.write_vint(delta * 2 + e.inv() as u64) }

/// read a dumped stream back, rebuilding hash-consed nodes.
pub(crate) fn restore(base: &mut BddBase, bytes: &[u8])->Result<Vec<BddEdge>> {
  let mut slice = bytes;
  let mut dec = BinDec::new(&mut slice);
  if !dec.read_signature(BDD_SIG)? {
    return Err(Error::invalid_argument("restore: wrong signature")) }
  let n = dec.read_vint()? as usize;
  let mut root_info = Vec::with_capacity(n);
  for _ in 0..n { root_info.push(dec.read_vint()?); }
  let mut edge_list: Vec<BddEdge> = vec![];
  loop {
    let my_id = edge_list.len() as u64 + 1;
    let level = dec.read_vint()?;
    let info0 = restore_edge(&mut dec, my_id)?;
    let info1 = restore_edge(&mut dec, my_id)?;
    if level == 0 && info0 == 0 && info1 == 0 { break }
    let e0 = decode(info0, &edge_list)?;
    let e1 = decode(info1, &edge_list)?;
    // make sure a variable exists at this level.
    while base.variable_num() <= level as usize { base.variable(base.variable_num()); }
    let e = base.new_node(level as u32, e0, e1);
    edge_list.push(e); }
  root_info.into_iter().map(|info| decode(info, &edge_list)).collect() }

fn restore_edge(dec: &mut BinDec, my_id: u64)->Result<u64> {
  let val = dec.read_vint()?;
  if val < 2 { return Ok(val) }  // constant
  let delta = val / 2;
  let inv = val & 1;
  if delta > my_id - 1 {
    return Err(Error::invalid_argument("restore: edge points past the stream")) }
  Ok((my_id - delta) * 2 + inv) }

fn decode(info: u64, edge_list: &[BddEdge])->Result<BddEdge> {
  if info == 0 { return Ok(BddEdge::zero()) }
  if info == 1 { return Ok(BddEdge::one()) }
  let id = (info / 2) as usize;
  let inv = info & 1 != 0;
  if id > edge_list.len() {
    return Err(Error::invalid_argument("restore: dangling edge")) }
  Ok(edge_list[id - 1].inv_if(inv)) }

// -- display -------------------------------------------------------------

fn write_edge(w: &mut dyn fmt::Write, info: u64)->fmt::Result {
  if info == 0 { write!(w, "   ZERO") }
  else if info == 1 { write!(w, "    ONE") }
  else { write!(w, "{:6}{}", info / 2, if info & 1 != 0 { "~" } else { " " }) }}

/// a tabular listing: one line per root, then one line per node.
pub(crate) fn display(base: &BddBase, w: &mut dyn fmt::Write, roots: &[BddEdge])->fmt::Result {
  let nc = NodeCollector::new(base, roots);
  for &root in roots {
    write!(w, "Root: ")?;
    write_edge(w, nc.edge2int(root))?;
    writeln!(w)?; }
  for (pos, &id) in nc.node_list.iter().enumerate() {
    let node = base.node(id);
    write!(w, "{:6}: {:4}", pos + 1, node.level)?;
    write_edge(w, nc.edge2int(node.e0))?;
    write!(w, ": ")?;
    write_edge(w, nc.edge2int(node.e1))?;
    writeln!(w)?; }
  Ok(()) }

// -- graphviz ------------------------------------------------------------

pub(crate) fn gen_dot(base: &BddBase, w: &mut dyn fmt::Write, roots: &[BddEdge],
                      option: &JsonValue)->Result<()> {
  let opts = DotOpts::parse(option)?;
  let nc = NodeCollector::new(base, roots);
  let mut dw = DotWriter::new(w);
  dw.graph_begin("bdd", &opts.graph);
  // the roots
  for (i, _) in roots.iter().enumerate() {
    let mut attrs = opts.root.clone();
    attrs.insert("label".to_string(), format!("BDD#{}", i + 1));
    dw.write_node(&format!("root{}", i + 1), &attrs); }
  // the nodes
  let mut max_level = 0u32;
  for (pos, &id) in nc.node_list.iter().enumerate() {
    let node = base.node(id);
    let var = base.level_to_var(node.level);
    let mut attrs = opts.label_attrs(var, &opts.node);
    attrs.entry("label".to_string()).or_insert_with(|| format!("x{}", var));
    dw.write_node(&format!("node{}", pos + 1), &attrs);
    max_level = max_level.max(node.level); }
  // the terminals
  let mut t0 = opts.terminal0_attrs();
  t0.entry("label".to_string()).or_insert_with(|| "0".to_string());
  dw.write_node("const0", &t0);
  let mut t1 = opts.terminal1_attrs();
  t1.entry("label".to_string()).or_insert_with(|| "1".to_string());
  dw.write_node("const1", &t1);
  // the edges
  let edge_name = |info: u64| {
    if info == 0 { "const0".to_string() }
    else if info == 1 { "const1".to_string() }
    else { format!("node{}", info / 2) }};
  let inv_attrs = |mut attrs: crate::dot::AttrList, info: u64| {
    if info > 1 && info & 1 != 0 {
      attrs.insert("dir".to_string(), "both".to_string());
      attrs.insert("arrowtail".to_string(), "odot".to_string()); }
    attrs };
  for (i, &root) in roots.iter().enumerate() {
    let info = nc.edge2int(root);
    dw.write_edge(&format!("root{}", i + 1), &edge_name(info),
                  &inv_attrs(opts.edge.clone(), info)); }
  for (pos, &id) in nc.node_list.iter().enumerate() {
    let node = base.node(id);
    let info0 = nc.edge2int(node.e0);
    let info1 = nc.edge2int(node.e1);
    dw.write_edge(&format!("node{}", pos + 1), &edge_name(info0),
                  &inv_attrs(opts.edge0_attrs(), info0));
    dw.write_edge(&format!("node{}", pos + 1), &edge_name(info1),
                  &inv_attrs(opts.edge1_attrs(), info1)); }
  // one rank group per level, roots at the top, terminals at the bottom
  let root_names: Vec<String> = (1..=roots.len()).map(|i| format!("root{}", i)).collect();
  if !root_names.is_empty() { dw.write_rank_group(&root_names, "min"); }
  for level in 0..=max_level {
    let names: Vec<String> = nc.node_list.iter().enumerate()
      .filter(|&(_, &id)| base.node(id).level == level)
      .map(|(pos, _)| format!("node{}", pos + 1))
      .collect();
    if !names.is_empty() { dw.write_rank_group(&names, "same"); }}
  dw.write_rank_group(&["const0".to_string(), "const1".to_string()], "max");
  dw.graph_end();
  Ok(()) }
