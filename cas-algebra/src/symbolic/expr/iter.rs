use super::Entity;

/// An iterator that traverses the tree of entities in left-to-right pre-order (i.e. depth-first,
/// parents before their children).
///
/// The traversal is lazy: nothing is allocated besides a stack of pending nodes, and dropping the
/// iterator early stops the traversal. Calling [`Entity::nodes`] again restarts it.
pub struct Nodes<'a> {
    stack: Vec<&'a Entity>,
}

impl<'a> Nodes<'a> {
    /// Creates a new iterator that traverses the tree rooted at `root`.
    pub fn new(root: &'a Entity) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a Entity;

    fn next(&mut self) -> Option<Self::Item> {
        let entity = self.stack.pop()?;
        for child in entity.children().into_iter().rev() {
            self.stack.push(child);
        }
        Some(entity)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn pre_order() {
        let x = Entity::var("x");
        let expr = Entity::pow(Entity::sin(x.clone()), Entity::integer(2));
        let nodes = expr.nodes().map(|node| node.to_string()).collect::<Vec<_>>();
        assert_eq!(nodes, vec!["sin(x)^2", "sin(x)", "x", "2"]);
    }

    #[test]
    fn early_termination() {
        let expr = Entity::sum((0..100).map(|n| Entity::var(format!("x{}", n))));
        assert_eq!(expr.nodes().take(3).count(), 3);
        assert_eq!(expr.nodes().count(), 101);
    }
}
