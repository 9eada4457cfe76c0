//! 增强后缀数组上的深度优先遍历。
//!
//! 按排名顺序读入 (suffix, lcp)，用显式栈自底向上还原隐式的 lcp 区间树，
//! 并在每个节点的生命周期内依次触发 [`DfsVisitor`] 的回调。遍历不使用递归，
//! 栈深度受树高限制而不受调用栈限制。

use log::debug;

use crate::error::EsaError;

/// 后缀数组中的一项：后缀起点及其与前一名后缀的 LCP（排名 0 时为 0）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuffixLcp {
    pub suffix: u32,
    pub lcp: u32,
}

/// 按排名顺序产出 [`SuffixLcp`] 的数据源
pub trait SuffixLcpSource {
    fn next_entry(&mut self) -> Result<Option<SuffixLcp>, EsaError>;
}

/// lcp 区间树遍历的回调集合。
///
/// `Node` 是调用方自己的节点状态，由引擎在节点存活期间保管并在每个事件中传回。
/// 任一回调返回 `Err` 时遍历立即终止，之后不再调用任何回调。
pub trait DfsVisitor {
    type Node;

    /// 进入一个新的内部节点
    fn on_node_enter(&mut self) -> Result<Self::Node, EsaError>;

    /// 叶子 `leaf` 挂到深度为 `father_depth` 的父节点下。
    /// `first_child` 仅对父节点处理的第一条边为真。
    fn on_leaf(
        &mut self,
        first_child: bool,
        father_depth: u32,
        father: &mut Self::Node,
        leaf: u32,
    ) -> Result<(), EsaError>;

    /// 子树 `son` 已完全遍历，即将并入父节点
    fn on_branch(
        &mut self,
        first_child: bool,
        father_depth: u32,
        father: &mut Self::Node,
        son: &mut Self::Node,
    ) -> Result<(), EsaError>;

    /// 节点及其全部子节点处理完毕，状态随后被丢弃
    fn on_node_exit(&mut self, node: Self::Node) -> Result<(), EsaError>;

    /// 节点区间的左端排名
    fn on_leftmost_leaf(&mut self, _node: &mut Self::Node, _lb: u32) -> Result<(), EsaError> {
        Ok(())
    }

    /// 节点区间的右端排名
    fn on_rightmost_leaf(&mut self, _node: &mut Self::Node, _rb: u32) -> Result<(), EsaError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DfsStats {
    pub leaves: u64,
    pub internal_nodes: u64,
    pub max_stack: usize,
}

struct Frame<N> {
    depth: u32,
    lb: u32,
    has_child: bool,
    node: N,
}

/// 遍历 `source` 描述的 lcp 区间树。
///
/// 子节点严格从左到右访问；某个子树的 `on_branch` 总在该子树内部所有事件之后、
/// 任何兄弟节点事件之前触发，随后是该子节点的 `on_node_exit`。
/// 根节点（深度 0）最先进入、最后退出。
pub fn depth_first_esa<S, V>(source: &mut S, visitor: &mut V) -> Result<DfsStats, EsaError>
where
    S: SuffixLcpSource + ?Sized,
    V: DfsVisitor + ?Sized,
{
    let mut stats = DfsStats { internal_nodes: 1, max_stack: 1, ..DfsStats::default() };
    let mut root = visitor.on_node_enter()?;
    visitor.on_leftmost_leaf(&mut root, 0)?;
    let mut stack = vec![Frame { depth: 0, lb: 0, has_child: false, node: root }];

    let Some(first) = source.next_entry()? else {
        let root = pop_frame(&mut stack)?;
        visitor.on_node_exit(root.node)?;
        return Ok(stats);
    };
    if first.lcp != 0 {
        return Err(EsaError::CorruptSource(format!("rank 0 has lcp {}", first.lcp)));
    }

    let mut leaf = first.suffix;
    let mut rank = 0u32;
    loop {
        let next = source.next_entry()?;
        let lcp = next.map_or(0, |e| e.lcp);
        step(&mut stack, visitor, &mut stats, leaf, rank, lcp)?;
        match next {
            Some(e) => {
                leaf = e.suffix;
                rank += 1;
            }
            None => break,
        }
    }

    let mut root = pop_frame(&mut stack)?;
    if !stack.is_empty() || root.depth != 0 {
        return Err(EsaError::CorruptSource("traversal ended below the root".to_string()));
    }
    visitor.on_rightmost_leaf(&mut root.node, rank)?;
    visitor.on_node_exit(root.node)?;

    debug!(
        "esa dfs: {} leaves, {} internal nodes, max stack {}",
        stats.leaves, stats.internal_nodes, stats.max_stack
    );
    Ok(stats)
}

fn pop_frame<N>(stack: &mut Vec<Frame<N>>) -> Result<Frame<N>, EsaError> {
    stack
        .pop()
        .ok_or_else(|| EsaError::CorruptSource("lcp interval stack underflow".to_string()))
}

fn top_frame<N>(stack: &mut [Frame<N>]) -> Result<&mut Frame<N>, EsaError> {
    stack
        .last_mut()
        .ok_or_else(|| EsaError::CorruptSource("edge without an open father".to_string()))
}

/// 处理排名为 `rank` 的叶子 `leaf`，`lcp` 为它与下一名后缀的 LCP。
fn step<V>(
    stack: &mut Vec<Frame<V::Node>>,
    visitor: &mut V,
    stats: &mut DfsStats,
    leaf: u32,
    rank: u32,
    lcp: u32,
) -> Result<(), EsaError>
where
    V: DfsVisitor + ?Sized,
{
    // 叶子属于当前栈顶，除非与下一名后缀共享更长的前缀
    let top = top_frame(stack)?;
    let leaf_done = lcp <= top.depth;
    if leaf_done {
        let first = !top.has_child;
        top.has_child = true;
        visitor.on_leaf(first, top.depth, &mut top.node, leaf)?;
        stats.leaves += 1;
    }

    let mut pending: Option<Frame<V::Node>> = None;
    while lcp < top_frame(stack)?.depth {
        let mut done = pop_frame(stack)?;
        visitor.on_rightmost_leaf(&mut done.node, rank)?;
        let father = top_frame(stack)?;
        if lcp <= father.depth {
            let first = !father.has_child;
            father.has_child = true;
            visitor.on_branch(first, father.depth, &mut father.node, &mut done.node)?;
            visitor.on_node_exit(done.node)?;
        } else {
            pending = Some(done);
        }
    }

    if lcp > top_frame(stack)?.depth {
        let mut node = visitor.on_node_enter()?;
        stats.internal_nodes += 1;
        let lb = pending.as_ref().map_or(rank, |f| f.lb);
        visitor.on_leftmost_leaf(&mut node, lb)?;
        match pending {
            Some(mut son) => {
                visitor.on_branch(true, lcp, &mut node, &mut son.node)?;
                visitor.on_node_exit(son.node)?;
            }
            None => {
                debug_assert!(!leaf_done);
                visitor.on_leaf(true, lcp, &mut node, leaf)?;
                stats.leaves += 1;
            }
        }
        stack.push(Frame { depth: lcp, lb, has_child: true, node });
        stats.max_stack = stats.max_stack.max(stack.len());
    }
    Ok(())
}
