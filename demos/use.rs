use avl_set::AvlTreeSet;

fn main() {
    let mut set = AvlTreeSet::new();
    for x in [10, 3, 15, 5, 7, 2] {
        set.insert(x);
    }
    assert!(!set.insert(15));
    assert!(set.contains(&7));
    set.remove(&3);
    assert!(!set.contains(&3));

    print!("{{ ");
    for x in &set {
        print!("{x}, ");
    }
    println!("}}");
    println!("len: {}, height: {}", set.len(), set.height());
}
