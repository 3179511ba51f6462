use std::io;

/// Parse an integer with an optional sign, then either decimal digits, a
/// `0x` hexadecimal number, or a leading-`0` octal number. The whole input
/// must be consumed.
pub fn parse_int(input: &[u8]) -> Option<i64> {
    let input = std::str::from_utf8(input).ok()?;

    let (negative, digits) = match input.as_bytes().first()? {
        b'-' => (true, &input[1..]),
        b'+' => (false, &input[1..]),
        _ => (false, input),
    };

    let (radix, digits) = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        (16, hex)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits)
    };

    // from_str_radix tolerates its own sign, which would allow `--5`
    if !digits.bytes().next()?.is_ascii_alphanumeric() {
        return None;
    }

    let magnitude = i128::from(u64::from_str_radix(digits, radix).ok()?);
    i64::try_from(if negative { -magnitude } else { magnitude }).ok()
}

/// Write `bytes`, escaping anything below a space as `\xHH`.
pub fn write_escaped(out: &mut impl io::Write, bytes: &[u8]) -> io::Result<()> {
    bytes
        .split_inclusive(|&b| b < b' ')
        .try_for_each(|chunk| match chunk.split_last() {
            Some((&last, head)) if last < b' ' => {
                out.write_all(head)?;
                write!(out, "\\x{last:02X}")
            }
            _ => out.write_all(chunk),
        })
}

/// Write `bytes` in double quotes, escaped as in [`write_escaped`].
pub fn write_quoted(out: &mut impl io::Write, bytes: &[u8]) -> io::Result<()> {
    out.write_all(b"\"")?;
    write_escaped(out, bytes)?;
    out.write_all(b"\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers() {
        assert_eq!(parse_int(b"1"), Some(1));
        assert_eq!(parse_int(b"-12"), Some(-12));
        assert_eq!(parse_int(b"+7"), Some(7));
        assert_eq!(parse_int(b"0"), Some(0));
        assert_eq!(parse_int(b"0x1F"), Some(31));
        assert_eq!(parse_int(b"-0x10"), Some(-16));
        assert_eq!(parse_int(b"010"), Some(8));
        assert_eq!(parse_int(b"-9223372036854775808"), Some(i64::MIN));
    }

    #[test]
    fn bad_integers() {
        for input in [
            &b""[..],
            b"-",
            b"0x",
            b"--5",
            b"+-5",
            b"12abc",
            b"1 ",
            b"09",
            b"9223372036854775808",
            b"\xff",
        ] {
            assert_eq!(parse_int(input), None, "{:?}", String::from_utf8_lossy(input));
        }
    }

    #[test]
    fn escaping() {
        let mut out = Vec::new();
        write_quoted(&mut out, b"a\tb\x01\n").unwrap();
        assert_eq!(out, b"\"a\\x09b\\x01\\x0A\"");

        let mut out = Vec::new();
        write_escaped(&mut out, b"plain").unwrap();
        assert_eq!(out, b"plain");
    }
}
