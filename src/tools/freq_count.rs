/// Returns a frequency count of the input data, indexed by byte value.
pub fn freqs(data: &[u8]) -> Vec<u32> {
    let mut freqs = vec![0_u32; 256];
    data.iter().for_each(|&el| freqs[el as usize] += 1);
    freqs
}

#[test]
fn freqs_test() {
    let f = freqs("abracadabra".as_bytes());
    assert_eq!(f[b'a' as usize], 5);
    assert_eq!(f[b'b' as usize], 2);
    assert_eq!(f[b'r' as usize], 2);
    assert_eq!(f[b'c' as usize], 1);
    assert_eq!(f[b'd' as usize], 1);
    assert_eq!(f.iter().sum::<u32>(), 11);
}

#[test]
fn freqs_empty_test() {
    assert!(freqs(&[]).iter().all(|&f| f == 0));
}
