//! The memoized apply recursions: AND, OR, XOR, ITE.
//!
//! Each operator short-circuits its trivial cases, normalizes its
//! operands (commutative operators swap to the smaller edge id first;
//! XOR factors both polarities out; ITE makes the condition positive),
//! consults its cache, and only then recurses on the top level's
//! cofactors.
use super::{BddBase, BddEdge};

impl BddBase {
  pub(crate) fn and(&mut self, left: BddEdge, right: BddEdge)->BddEdge {
    // case 1: either operand 0 -> 0.
    if left.is_zero() || right.is_zero() { return BddEdge::zero() }
    // case 2: one side is 1 -> the other.
    if left.is_one() { return right }
    if right.is_one() { return left }
    // case 3: equal operands.
    if left == right { return left }
    // case 4: complementary operands -> 0.
    if left == !right { return BddEdge::zero() }

    // commutative: smaller edge first.
    let (left, right) = if left.packed <= right.packed { (left, right) }
                        else { (right, left) };
    let key = (left.packed, right.packed);
    if let Some(&e) = self.and_cache.get(&key) { return e }

    let (top, l0, l1, r0, r1) = self.decomp(left, right);
    let a0 = self.and(l0, r0);
    let a1 = self.and(l1, r1);
    let result = self.new_node(top, a0, a1);
    self.and_cache.insert(key, result);
    result }

  pub(crate) fn or(&mut self, left: BddEdge, right: BddEdge)->BddEdge {
    // De Morgan through the AND cache.
    !self.and(!left, !right) }

  pub(crate) fn xor(&mut self, left: BddEdge, right: BddEdge)->BddEdge {
    // case 1: one side is 0 -> the other.
    if left.is_zero() { return right }
    if right.is_zero() { return left }
    // case 2: one side is 1 -> the other inverted.
    if left.is_one() { return !right }
    if right.is_one() { return !left }
    // case 3: equal operands -> 0.
    if left == right { return BddEdge::zero() }
    // case 4: complementary operands -> 1.
    if left == !right { return BddEdge::one() }

    // both polarities factor out of xor.
    let oinv = left.inv() ^ right.inv();
    let left = left.positive();
    let right = right.positive();
    let (left, right) = if left.packed <= right.packed { (left, right) }
                        else { (right, left) };
    let key = (left.packed, right.packed);
    if let Some(&e) = self.xor_cache.get(&key) { return e.inv_if(oinv) }

    let (top, l0, l1, r0, r1) = self.decomp(left, right);
    let a0 = self.xor(l0, r0);
    let a1 = self.xor(l1, r1);
    let result = self.new_node(top, a0, a1);
    self.xor_cache.insert(key, result);
    result.inv_if(oinv) }

  pub(crate) fn ite(&mut self, e0: BddEdge, e1: BddEdge, e2: BddEdge)->BddEdge {
    // a constant condition picks a branch.
    if e0.is_zero() { return e2 }
    if e0.is_one() { return e1 }
    // a constant branch reduces to and/or.
    if e1.is_zero() { return self.and(!e0, e2) }
    if e1.is_one() { return self.or(e0, e2) }
    if e2.is_zero() { return self.and(e0, e1) }
    if e2.is_one() { return self.or(!e0, e1) }
    // equal or complementary branches.
    if e1 == e2 { return e1 }
    if e1 == !e2 { return self.xor(e0, e2) }
    // the condition folding into a branch.
    if e0 == e1 { return self.or(e0, e2) }
    if e0 == !e1 { return self.and(e1, e2) }
    if e0 == e2 { return self.and(e0, e1) }
    if e0 == !e2 { return self.or(!e0, e1) }

    // canonical: condition positive (swap the branches).
    let (e0, e1, e2) = if e0.inv() { (!e0, e2, e1) } else { (e0, e1, e2) };
    let key = (e0.packed, e1.packed, e2.packed);
    if let Some(&e) = self.ite_cache.get(&key) { return e }

    let l0 = self.level(e0);
    let l1 = self.level(e1);
    let l2 = self.level(e2);
    let top = l0.min(l1).min(l2);
    let (e00, e01) = if l0 == top { self.branches(e0) } else { (e0, e0) };
    let (e10, e11) = if l1 == top { self.branches(e1) } else { (e1, e1) };
    let (e20, e21) = if l2 == top { self.branches(e2) } else { (e2, e2) };
    let r0 = self.ite(e00, e10, e20);
    let r1 = self.ite(e01, e11, e21);
    let result = self.new_node(top, r0, r1);
    self.ite_cache.insert(key, result);
    result }}
