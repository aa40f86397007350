pub const fn wrap_decrement(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    if index == 0 {
        len - 1
    } else {
        index - 1
    }
}

pub const fn wrap_increment(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    (index + 1) % len
}

/// Position of `current` in `items` stepped by one, wrapping; first item when absent.
pub fn step_through(items: &[usize], current: Option<usize>, forward: bool) -> Option<usize> {
    if items.is_empty() {
        return None;
    }
    let position = match current.and_then(|c| items.iter().position(|&i| i == c)) {
        Some(position) if forward => wrap_increment(position, items.len()),
        Some(position) => wrap_decrement(position, items.len()),
        None if forward => 0,
        None => items.len() - 1,
    };
    items.get(position).copied()
}
