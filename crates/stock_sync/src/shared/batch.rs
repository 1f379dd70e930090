/// Делит срез на последовательные пакеты по `size` элементов.
///
/// Последний пакет может быть короче. Порядок элементов сохраняется,
/// итератор ленивый и не держит общего состояния между вызовами.
/// `size` должен быть больше нуля (проверяется при загрузке конфигурации).
pub fn batches<T>(items: &[T], size: usize) -> std::slice::Chunks<'_, T> {
    debug_assert!(size > 0, "batch size must be positive");
    items.chunks(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batches_keep_order_and_bounds() {
        let items: Vec<i32> = (1..=5).collect();
        let parts: Vec<&[i32]> = batches(&items, 2).collect();
        assert_eq!(parts, vec![&[1, 2][..], &[3, 4][..], &[5][..]]);
    }

    #[test]
    fn test_batches_concat_reproduces_input() {
        for len in 0..25usize {
            let items: Vec<usize> = (0..len).collect();
            for size in 1..8usize {
                let parts: Vec<&[usize]> = batches(&items, size).collect();
                assert!(parts.iter().all(|p| !p.is_empty() && p.len() <= size));
                let short = parts.iter().filter(|p| p.len() < size).count();
                assert_eq!(short, usize::from(len % size != 0));
                assert_eq!(parts.concat(), items);
            }
        }
    }

    #[test]
    fn test_batches_restartable() {
        let items = vec!["a", "b", "c"];
        let first: Vec<_> = batches(&items, 2).collect();
        let second: Vec<_> = batches(&items, 2).collect();
        assert_eq!(first, second);
    }
}
