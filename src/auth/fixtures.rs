// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Test fixtures: a 2048-bit RSA authority key and SHA-1 signatures made with
//! its private half (`openssl dgst -sha1 -sign`).

/// Authority public key, base64 DER SubjectPublicKeyInfo.
pub const PUBLIC_KEY_B64: &str = "MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEAzxIudl/ACaEJYrUbHiApF2LwUFvv5GA2OI5LvwSVTatNFRuKRu6g1+b/6P+6pGn36J8xrFsKhVi+dFsqbLRrM+vwzHBwFrW0odpG9kcFZ0BRNkOsW4jsyq/AN+rG086BfA+ajly4Gwizj0QiiqjdYu0Z/B6g0lcblytcTf/L3erTLaOm/XOU7xO8R+wYPvHx62g/sG8evZkjRovUPZ9sN/30bMl3/Ik6ehDjQHlkxOvTK4jpAc/5MAYUNe3TSYLkT+wV8Mlsy7KvOYnfBsbsnvv96z2+rIGIi9gUUDNuE3cWkmEv27srINFrMxKzKaFNwa3y1VYfGOB4aN79NGHpCQIDAQAB";

/// Signature over `test-localhost`.
pub const TOKEN_TEST_LOCALHOST: &str = "anrCsFPMrYDuwT5g54ao7zeumWH2fwVjWo+wCbzYEP5quLHS0Q1p6DesK5mMtZBHQdRtvz0NnVW1GAe5XKfx6+i+fvrePTAq1IT+S4pBkypEGtyA2b603MSXIbR1n0TOg8OqS9I4wO7vUlsAmY/g+lWxyg1oDZPHXpzgiVrKOSdlrifO2w9OpVJLxDs69mRfRzrby9nDMzhe4u7IsH86Hye+Wq4jMLjUSIo1cnWNLgE3S53HLSXk8xGWr42Ca/D+HPvIieQhCKcRQcuDTSure1BSRrHMKRHst7t71LpqfTK5LTNTBykchztCAMmaVSz+k8hk3ev8/Qas5swOhYYwgw==";

/// Signature over `test-example.com`.
pub const TOKEN_TEST_EXAMPLE_COM: &str = "y7laOnrKs4RByQzdJHAfg8w5W0FBbyJvp0VHJhri5V/86lOyCvvr1Kd+PiFDVTN/hzlKw0QYQbAxvIpjY3OfYSn5fiLJPnd0H+sSNooqPZIBunxA/s5nkiyFPPFyTpyCHRkkaa+rm7ELWmry6EjJyju7eTUN127A5DIJ9UKOjZ3Hd4btckqBPuq4oqUUlfBOx5AvSbU2kaQMrF7VBmpE/2tZMF6wBlJbDDfV1V2gbRkCyw+zyxqPegx56IPUy47hjtNae/uHwXqiduK2fRr0NSe1TFNU3QxRZWeFTnevs/ICCQ/FRJZMqSSbv13DV8+EbA8GZtgZtoysayIJabi28g==";

/// Signature over `jane.doe-example.com`.
pub const TOKEN_JANE_EXAMPLE_COM: &str = "A3QFSDLROe3WR1eR26THWTQcVYk+XQjQ7i+hfpSPpP2tLh7p8DCR204ngSiJO6RMWMjSumO62lC8HBzjZrbuEChQU8xfNJHao9Tlj0wHuCi6dC7FsRXxGQePnG5pTZuSgW9lRgT60AIrs0Co2CulHwr3zU2UUCzTI4oRODPbpD91EBy99jRemA8cOeBSUSlwKI0DFkmZEUm5lfNLNbHkQuTWy4tvU2BlmHEDpeisXKkLa0IiKIJ09bkLR/QKbdfTPbUomnw5WlDEGVvYjK2/NPrY65yCIga0d0jmwEzd2DNeb024EU97k//k1X8ZIrZP4x1mjCbnPzX2/t6C2gxtKQ==";

/// Signature over `test-localhost` made by an unrelated 2048-bit key.
pub const TOKEN_TEST_LOCALHOST_OTHER_KEY: &str = "hm/jG8g7pIGMRjwVWtkRNpRdHReURkhjWXwYqdwNKv4cMIukE2SVORV7MkCM2vq5YXYzb+NH2KVX6MYSRwIhdTWmmBkM1PSy7zzC0S5wSop0swWmSjwyA91XgVZEq2mL83jH9YkS+3mSM1khPVAG1yqXvlCnla9rwMG0jdXF+h8HrTyw/qMw/z9tG+xnHAVEEkoNfMByrJcalIj5pcpG27n4dXYdulUPANGHZKBuHQu1kYGgfGtU7Yq2IcDbROv5mDWEC9Tb1lh8IvRR3dNXMe46Zx9tCV49nwmZ0w90vNmJe06NoaZR+v7bFpEsADlWsy+DHvw4s34gzmHMXJQMog==";

/// SHA-256 signature over `test-localhost` by the authority key.
pub const TOKEN_TEST_LOCALHOST_SHA256: &str = "omT2ZzjSUP659ZQsBgqhHq5sWyXhUfuEsbw+EsTrCpoF82lCCj2LRxWP+acbFnveU27s7Jy7AA6nBvNWvDeWjKf8igVjDFC1LL0e19aw7xkKWfeJjos06mV/SlkBbUZdNH2i6t4c/SLq+YG9Go35wl5+LNUOC62ooBTOxriN8D4DYXKOz1tFSV7OD10UYZ6hr+VlW0y1eoHF+UijqpeRM8V+qHT0uSUXxwoyS3s2BcLpy9JTJha/gzFsSt9/4QiJWHM2wsvy8vudCCrpXMqqr2i/xXi2Xg98F8Iqj5O9h8FnUSc0jn4apyuuNxNsTV4eODiwbb10wc7GIbMkbB/6TA==";

/// 1024-bit RSA public key, too short for the signature scheme.
pub const SHORT_RSA_KEY_B64: &str = "MIGfMA0GCSqGSIb3DQEBAQUAA4GNADCBiQKBgQDS9k3waVvHM18KDUvhfOPn8iZ3ihJ6uN16sABubOtYSWleS6nail46i7Lz2b1OGz/wN2sDVerXB4QlhFc6LAm8ylvwJgdu6bSljVP24PN39qI89Yv4qzo9zwhPN5cSCzfecPmG4WKP6AUM2CHDh7cBVs29u41FQfyBb677/W1M3wIDAQAB";

/// P-256 public key.
pub const EC_KEY_B64: &str = "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEPTRjZ/ibKJiTcG74R9BCOL2zZF9P51eb5yKEF6n6KDTJSh5rSJaO51vCo+K+xXuvI7KNtOeX/Q5DzD80ESMMkA==";

/// Build a key cache already holding the authority key.
pub fn loaded_cache() -> super::KeyCache {
    let cache = super::KeyCache::new();
    let key = super::SigningKey::from_base64_der(PUBLIC_KEY_B64).unwrap();
    cache.replace(key);
    cache
}
