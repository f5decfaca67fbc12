//! Thin wrappers over the libc calls the kernel offers no file for.

/// `uname(2)` fields
#[derive(Debug, Clone, Default)]
pub(crate) struct Uname {
    pub sysname: String,
    pub release: String,
    pub version: String,
    pub machine: String,
}

/// Block counts from `statvfs(3)`
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FsStats {
    pub fragment_size: u64,
    pub blocks: u64,
    pub blocks_free: u64,
    pub blocks_available: u64,
}

pub(crate) use imp::*;

#[cfg(target_os = "linux")]
mod imp {
    use super::{FsStats, Uname};
    use crate::source::{AddressFamily, InterfaceAddressReading};
    use std::ffi::{CStr, CString};
    use std::io;
    use std::mem::MaybeUninit;
    use std::net::{Ipv4Addr, Ipv6Addr};
    use std::os::unix::ffi::OsStrExt;
    use std::path::Path;

    fn c_chars_to_string(chars: &[libc::c_char]) -> String {
        let bytes: Vec<u8> = chars
            .iter()
            .take_while(|&&c| c != 0)
            .map(|&c| c as u8)
            .collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub(crate) fn uname() -> io::Result<Uname> {
        let mut buf = MaybeUninit::<libc::utsname>::uninit();
        // SAFETY: uname fills the provided struct on success.
        let result = unsafe { libc::uname(buf.as_mut_ptr()) };
        if result != 0 {
            return Err(io::Error::last_os_error());
        }
        let buf = unsafe { buf.assume_init() };

        Ok(Uname {
            sysname: c_chars_to_string(&buf.sysname),
            release: c_chars_to_string(&buf.release),
            version: c_chars_to_string(&buf.version),
            machine: c_chars_to_string(&buf.machine),
        })
    }

    pub(crate) fn statvfs(path: &Path) -> io::Result<FsStats> {
        let c_path = CString::new(path.as_os_str().as_bytes())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let mut stats = MaybeUninit::<libc::statvfs>::uninit();

        // SAFETY: c_path is NUL-terminated and stats is a valid out pointer.
        let result = unsafe { libc::statvfs(c_path.as_ptr(), stats.as_mut_ptr()) };
        if result != 0 {
            return Err(io::Error::last_os_error());
        }
        let stats = unsafe { stats.assume_init() };

        Ok(FsStats {
            fragment_size: stats.f_frsize as u64,
            blocks: stats.f_blocks as u64,
            blocks_free: stats.f_bfree as u64,
            blocks_available: stats.f_bavail as u64,
        })
    }

    pub(crate) fn hostname() -> io::Result<String> {
        let mut buf = [0 as libc::c_char; 256];
        // SAFETY: buf is writable for buf.len() bytes.
        let result = unsafe { libc::gethostname(buf.as_mut_ptr(), buf.len()) };
        if result != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(c_chars_to_string(&buf))
    }

    pub(crate) fn online_cpus() -> Option<usize> {
        // SAFETY: sysconf has no memory-safety preconditions.
        let count = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) };
        if count > 0 {
            Some(count as usize)
        } else {
            None
        }
    }

    /// Decode a socket address into its family and display form.
    ///
    /// # Safety
    /// `addr` must be null or point to a valid `sockaddr` whose concrete type
    /// matches its `sa_family`.
    unsafe fn sockaddr_to_string(addr: *const libc::sockaddr) -> Option<(AddressFamily, String)> {
        if addr.is_null() {
            return None;
        }

        match (*addr).sa_family as libc::c_int {
            libc::AF_INET => {
                let sin = &*(addr as *const libc::sockaddr_in);
                let ip = Ipv4Addr::from(u32::from_be(sin.sin_addr.s_addr));
                Some((AddressFamily::Ipv4, ip.to_string()))
            }
            libc::AF_INET6 => {
                let sin6 = &*(addr as *const libc::sockaddr_in6);
                let ip = Ipv6Addr::from(sin6.sin6_addr.s6_addr);
                Some((AddressFamily::Ipv6, ip.to_string()))
            }
            libc::AF_PACKET => {
                let sll = &*(addr as *const libc::sockaddr_ll);
                let len = (sll.sll_halen as usize).min(sll.sll_addr.len());
                let mac = sll.sll_addr[..len]
                    .iter()
                    .map(|b| format!("{:02x}", b))
                    .collect::<Vec<_>>()
                    .join(":");
                Some((AddressFamily::Link, mac))
            }
            _ => None,
        }
    }

    pub(crate) fn interface_addresses() -> io::Result<Vec<InterfaceAddressReading>> {
        let mut head: *mut libc::ifaddrs = std::ptr::null_mut();
        // SAFETY: on success head points to a list released by freeifaddrs below.
        if unsafe { libc::getifaddrs(&mut head) } != 0 {
            return Err(io::Error::last_os_error());
        }

        let mut addresses = Vec::new();
        let mut cursor = head;
        while !cursor.is_null() {
            // SAFETY: cursor walks the list returned by getifaddrs.
            let ifa = unsafe { &*cursor };
            cursor = ifa.ifa_next;

            let Some((family, address)) = (unsafe { sockaddr_to_string(ifa.ifa_addr) }) else {
                continue;
            };
            let interface = unsafe { CStr::from_ptr(ifa.ifa_name) }
                .to_string_lossy()
                .into_owned();
            let netmask = unsafe { sockaddr_to_string(ifa.ifa_netmask) }.map(|(_, s)| s);
            let broadcast = if ifa.ifa_flags & libc::IFF_BROADCAST as libc::c_uint != 0 {
                unsafe { sockaddr_to_string(ifa.ifa_ifu) }.map(|(_, s)| s)
            } else {
                None
            };

            addresses.push(InterfaceAddressReading {
                interface,
                family,
                address,
                netmask,
                broadcast,
            });
        }

        // SAFETY: head came from getifaddrs and is freed exactly once.
        unsafe { libc::freeifaddrs(head) };
        Ok(addresses)
    }
}

#[cfg(not(target_os = "linux"))]
mod imp {
    use super::{FsStats, Uname};
    use crate::source::InterfaceAddressReading;
    use std::io;
    use std::path::Path;

    fn unsupported<T>() -> io::Result<T> {
        Err(io::Error::new(io::ErrorKind::Unsupported, "not supported on this platform"))
    }

    pub(crate) fn uname() -> io::Result<Uname> {
        unsupported()
    }

    pub(crate) fn statvfs(_path: &Path) -> io::Result<FsStats> {
        unsupported()
    }

    pub(crate) fn hostname() -> io::Result<String> {
        std::env::var("HOSTNAME")
            .or_else(|_| std::env::var("COMPUTERNAME"))
            .map_err(|e| io::Error::new(io::ErrorKind::NotFound, e))
    }

    pub(crate) fn online_cpus() -> Option<usize> {
        std::thread::available_parallelism().ok().map(|n| n.get())
    }

    pub(crate) fn interface_addresses() -> io::Result<Vec<InterfaceAddressReading>> {
        unsupported()
    }
}
