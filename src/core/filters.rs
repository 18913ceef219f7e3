use crate::models::{Mentee, Mentor};

/// Check whether the pair has different genders
///
/// Genders are normalized at load time, so plain equality is enough.
#[inline]
pub fn genders_differ(mentee: &Mentee, mentor: &Mentor) -> bool {
    mentee.person.gender != mentor.person.gender
}

/// Count how many of a side's gender preferences the pair violates (0, 1 or 2)
///
/// Mentee and mentor preferences are checked independently.
#[inline]
pub fn gender_preference_violations(mentee: &Mentee, mentor: &Mentor) -> u32 {
    if !genders_differ(mentee, mentor) {
        return 0;
    }

    u32::from(mentee.person.prefers_own_gender) + u32::from(mentor.person.prefers_own_gender)
}

/// Check if the mentee wants a mentor from the same origin and didn't get one
///
/// A different state or a different country both count, but only once.
#[inline]
pub fn violates_origin_preference(mentee: &Mentee, mentor: &Mentor) -> bool {
    mentee.prefers_same_origin
        && (mentee.person.state_of_origin != mentor.person.state_of_origin
            || mentee.person.country_of_origin != mentor.person.country_of_origin)
}

/// Location tags both sides listed
#[inline]
pub fn shared_locations<'a>(mentee: &'a Mentee, mentor: &'a Mentor) -> impl Iterator<Item = &'a String> {
    mentee.person.locations.intersection(&mentor.person.locations)
}

#[inline]
pub fn same_state(mentee: &Mentee, mentor: &Mentor) -> bool {
    mentee.person.state_of_origin == mentor.person.state_of_origin
}

#[inline]
pub fn same_country(mentee: &Mentee, mentor: &Mentor) -> bool {
    mentee.person.country_of_origin == mentor.person.country_of_origin
}
